use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// Files that fail to parse or write are reported but do not change the status; only
/// the command as a whole can fail.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command completed, even if some files were skipped.
    Success,
    /// Command refused to run (e.g. `init` with an existing config file).
    Failure,
    /// Fatal error (bad configuration, invalid pattern, I/O failure outside a single file).
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
