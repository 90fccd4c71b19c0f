use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::{Config, Mode};
use crate::core::rewrite::WrapChange;
use crate::extract::{ExtractedKey, clean::CleanReport, output::OutputFormat};
use crate::issues::{Issue, Report, ReportLocation};
use crate::wrapper::FileDetection;

// ============================================================
// Parameters
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetConfigParams {
    /// Absolute path of the project root
    pub project_root_path: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WrapParams {
    /// Absolute path of the project root
    pub project_root_path: String,
    /// Source file glob, relative to the project root (default: from config)
    #[serde(default)]
    pub pattern: Option<String>,
    /// Translation binding to inject: client, server or auto (default: from config)
    #[serde(default)]
    pub mode: Option<Mode>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractKeysParams {
    /// Absolute path of the project root
    pub project_root_path: String,
    /// Rebuild locale files from the extracted keys, dropping existing entries
    #[serde(default)]
    pub force: Option<bool>,
    /// json (default) or csv
    #[serde(default)]
    pub format: Option<OutputFormat>,
    /// Only report what would be written
    #[serde(default)]
    pub dry_run: Option<bool>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanLocalesParams {
    /// Absolute path of the project root
    pub project_root_path: String,
    /// Only report what would be removed
    #[serde(default)]
    pub dry_run: Option<bool>,
    /// Copy each locale file aside before overwriting it (default: true)
    #[serde(default)]
    pub backup: Option<bool>,
}

// ============================================================
// Config Types (get_config)
// ============================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    /// True if config was loaded from a file, false if using defaults
    pub from_file: bool,
    pub config: Config,
}

// ============================================================
// Wrap Types (preview_wrap, wrap_files)
// ============================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapResult {
    pub dry_run: bool,
    pub files_scanned: usize,
    /// Files rewritten, or that would be in a dry run
    pub modified_files: Vec<String>,
    pub changes: Vec<WrapChange>,
    pub issues: Vec<IssueItem>,
    /// Client/server classification per file, in auto mode
    pub detections: Vec<FileDetection>,
}

/// A reported problem, flattened for JSON.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueItem {
    pub rule: String,
    pub severity: String,
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
    pub message: String,
}

impl From<&Issue> for IssueItem {
    fn from(issue: &Issue) -> Self {
        let (line, col) = match issue.location() {
            ReportLocation::Source(ctx) => (Some(ctx.line()), Some(ctx.col())),
            ReportLocation::File { .. } => (None, None),
        };
        Self {
            rule: issue.report_rule().to_string(),
            severity: issue.report_severity().to_string(),
            file_path: issue.file_path().to_string(),
            line,
            col,
            message: issue.message(),
        }
    }
}

// ============================================================
// Extract Types (extract_keys)
// ============================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractKeysResult {
    pub files_scanned: usize,
    pub key_count: usize,
    pub keys: Vec<ExtractedKey>,
    pub files: Vec<WrittenFile>,
    pub issues: Vec<IssueItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WrittenFile {
    pub path: String,
    pub added_keys: usize,
    pub written: bool,
}

// ============================================================
// Clean Types (clean_locales)
// ============================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanLocalesResult {
    pub files_scanned: usize,
    #[serde(flatten)]
    pub report: CleanReport,
    pub issues: Vec<IssueItem>,
}
