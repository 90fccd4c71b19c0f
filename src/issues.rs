//! Per-file problems found while wrapping or extracting.
//!
//! None of these abort a run. Each carries what the reporters (CLI and MCP) need to
//! display it.

use enum_dispatch::enum_dispatch;

use crate::core::context::SourceContext;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    UnwrappedText,
    ParseError,
    ReadError,
    WriteError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::UnwrappedText => write!(f, "unwrapped-text"),
            Rule::ParseError => write!(f, "parse-error"),
            Rule::ReadError => write!(f, "read-error"),
            Rule::WriteError => write!(f, "write-error"),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// Translatable text outside any component, left for manual handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrappedTextIssue {
    pub context: SourceContext,
    pub text: String,
}

/// File could not be parsed (or transformed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

/// File could not be read, or is not UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadErrorIssue {
    pub file_path: String,
    pub error: String,
}

/// Rewritten text could not be written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteErrorIssue {
    pub file_path: String,
    pub error: String,
}

/// A problem found in one file.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    UnwrappedText(UnwrappedTextIssue),
    ParseError(ParseErrorIssue),
    ReadError(ReadErrorIssue),
    WriteError(WriteErrorIssue),
}

impl Issue {
    pub fn file_path(&self) -> &str {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.file_path(),
            ReportLocation::File { path } => path,
        }
    }

    /// Failed to process the file at all, as opposed to a warning about its content.
    pub fn is_file_failure(&self) -> bool {
        !matches!(self, Issue::UnwrappedText(_))
    }
}

// ============================================================
// Report Trait
// ============================================================

/// Where an issue points.
pub enum ReportLocation<'a> {
    /// Source code location (has source_line for context display).
    Source(&'a SourceContext),
    /// File-level only, no line context.
    File { path: &'a str },
}

/// Interface for the report functions. Uses `enum_dispatch` for zero-cost dispatch
/// over [`Issue`].
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for UnwrappedTextIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.text.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::UnwrappedText
    }

    fn hint(&self) -> Option<&str> {
        Some("text outside a component cannot reach `t`; move it into one or wrap it by hand")
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::ParseError
    }
}

impl Report for ReadErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::ReadError
    }
}

impl Report for WriteErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::WriteError
    }

    fn details(&self) -> Option<String> {
        Some("the file was left unchanged".to_string())
    }
}
