//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format. Every printer has a `*_to` variant taking
//! a writer so output can be captured in tests.

use std::io::{self, Write};
use std::time::Duration;

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::extract::{Extraction, clean::CleanReport, output::OutputFile};
use crate::issues::{Issue, Report, ReportLocation, Severity};
use crate::perf::CompletionReport;
use crate::wrapper::RunResult;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Set to any value to leave durations out of the completion report.
pub const DISABLE_TIMING_ENV: &str = "TWRAP_DISABLE_TIMING";

/// Print issues in cargo-style format.
///
/// Issues are sorted and displayed with severity, location, source context, and details.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort_by(compare_issues);

    // Calculate max line number width for alignment
    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Print the outcome of a `wrap` run.
pub fn print_wrap_result(result: &RunResult, verbose: bool) {
    print_wrap_result_to(
        result,
        verbose,
        timing_enabled(),
        &mut io::stdout().lock(),
    );
}

pub fn print_wrap_result_to<W: Write>(
    result: &RunResult,
    verbose: bool,
    show_timing: bool,
    writer: &mut W,
) {
    for file in &result.processed_files {
        let verb = if result.dry_run {
            "Would modify".yellow().bold()
        } else {
            "Modified".green().bold()
        };
        let _ = writeln!(writer, "{} {}", verb, file);

        if verbose {
            for change in result
                .changes
                .iter()
                .filter(|c| &c.location.file_path == file)
            {
                let _ = writeln!(
                    writer,
                    "  {}:{} {} {} {}",
                    change.location.line,
                    change.location.col,
                    change.original.dimmed(),
                    "->".blue(),
                    change.replacement
                );
            }
        }
    }

    if verbose {
        for detection in &result.detections {
            let _ = writeln!(
                writer,
                "{} {} is a {} module ({}% confidence)",
                "note:".bold(),
                detection.file_path,
                detection.detection.kind,
                detection.detection.confidence
            );
        }
    }

    if !result.processed_files.is_empty() && !result.issues.is_empty() {
        let _ = writeln!(writer);
    }
    report_to(&result.issues, writer);

    let modified = result.processed_files.len();
    let verb = if result.dry_run {
        "Would wrap"
    } else {
        "Wrapped"
    };
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "{} {} {} in {} of {} {}",
            verb,
            result.changes.len(),
            plural(result.changes.len(), "literal", "literals"),
            modified,
            result.files_scanned,
            plural(result.files_scanned, "file", "files")
        )
        .green()
    );

    if show_timing && !result.metrics.is_empty() {
        print_completion_report_to(&CompletionReport::from_metrics(&result.metrics), writer);
    }
}

/// Timing part of the completion report.
pub fn print_completion_report_to<W: Write>(report: &CompletionReport, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} in {} ({} per file)",
        "Finished".green().bold(),
        format_duration(report.total),
        format_duration(report.average_per_file)
    );
    if report.slowest_files.is_empty() {
        return;
    }
    let _ = writeln!(writer, "{}", "Slowest files:".bold());
    for (path, duration) in &report.slowest_files {
        let _ = writeln!(writer, "  {} {}", format_duration(*duration).cyan(), path);
    }
}

/// Print the outcome of an `extract` run.
pub fn print_extraction(extraction: &Extraction, files: &[OutputFile], verbose: bool) {
    print_extraction_to(extraction, files, verbose, &mut io::stdout().lock());
}

pub fn print_extraction_to<W: Write>(
    extraction: &Extraction,
    files: &[OutputFile],
    verbose: bool,
    writer: &mut W,
) {
    report_to(&extraction.issues, writer);

    for file in files {
        let verb = if file.written {
            "Wrote".green().bold()
        } else {
            "Would write".yellow().bold()
        };
        let _ = writeln!(
            writer,
            "{} {} ({} new {})",
            verb,
            file.path.display(),
            file.added_keys,
            plural(file.added_keys, "key", "keys")
        );
        if verbose && !file.written {
            for line in file.content.lines() {
                let _ = writeln!(writer, "  {} {}", "|".blue(), line);
            }
        }
    }

    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Found {} unique {} in {} {}",
            extraction.keys.len(),
            plural(extraction.keys.len(), "key", "keys"),
            extraction.files_scanned,
            plural(extraction.files_scanned, "file", "files")
        )
        .green()
    );
}

/// Key lists longer than this are truncated unless verbose.
const KEY_LIST_LIMIT: usize = 20;

pub fn print_clean(extraction: &Extraction, report: &CleanReport, verbose: bool) {
    print_clean_to(extraction, report, verbose, &mut io::stdout().lock());
}

pub fn print_clean_to<W: Write>(
    extraction: &Extraction,
    report: &CleanReport,
    verbose: bool,
    writer: &mut W,
) {
    report_to(&extraction.issues, writer);

    for file in &report.files {
        let verb = if file.written {
            "Cleaned".green().bold()
        } else {
            "Would clean".yellow().bold()
        };
        let _ = writeln!(
            writer,
            "{} {} ({} -> {} {})",
            verb,
            file.path.display(),
            file.keys_before,
            file.keys_after,
            plural(file.keys_after, "key", "keys")
        );
        if let Some(backup) = &file.backup {
            let _ = writeln!(writer, "  {} {}", "backup:".dimmed(), backup.display());
        }
    }

    print_key_list("Removed (unused in code):", &report.unused, verbose, writer);
    print_key_list("Removed (invalid value):", &report.invalid_value, verbose, writer);
    print_key_list(
        "Missing from the default language:",
        &report.missing,
        verbose,
        writer,
    );

    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Kept {} of {} used {}, removed {}",
            report.kept.len(),
            report.used_keys,
            plural(report.used_keys, "key", "keys"),
            report.removed()
        )
        .green()
    );
}

/// Scan failures stop a clean: keys used only in those files would look unused.
pub fn print_clean_blocked(extraction: &Extraction) {
    print_clean_blocked_to(extraction, &mut io::stdout().lock());
}

pub fn print_clean_blocked_to<W: Write>(extraction: &Extraction, writer: &mut W) {
    report_to(&extraction.issues, writer);
    let failures = extraction.scan_failures();
    let _ = writeln!(
        writer,
        "{} {}",
        FAILURE_MARK.red(),
        format!(
            "{} {} could not be scanned; no keys were removed",
            failures,
            plural(failures, "file", "files")
        )
        .red()
    );
}

fn print_key_list<W: Write>(title: &str, keys: &[String], verbose: bool, writer: &mut W) {
    if keys.is_empty() {
        return;
    }
    let _ = writeln!(writer, "{}", title.bold());
    let shown = if verbose { keys.len() } else { KEY_LIST_LIMIT };
    for key in keys.iter().take(shown) {
        let _ = writeln!(writer, "  - {}", key);
    }
    if keys.len() > shown {
        let _ = writeln!(writer, "  ... and {} more", keys.len() - shown);
    }
}

fn timing_enabled() -> bool {
    std::env::var_os(DISABLE_TIMING_ENV).is_none()
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2?}", duration)
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let loc = issue.location();
    let (file_path, line, col, source_line) = extract_location_info(&loc);

    // Print severity and message (cargo-style)
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    // Print clickable location: --> path:line:col
    if line > 0 {
        let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file_path, line, col);
    } else {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), file_path);
    }

    // Print source context if available
    if let Some(source_line) = source_line {
        let caret_char = match severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
        };

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // Caret pointing to the column (col is 1-based)
        let prefix = if col > 1 {
            source_line.chars().take(col - 1).collect::<String>()
        } else {
            String::new()
        };
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        );
    }

    // Print details if present (cargo-style note)
    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    // Print hint if present
    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Warning)
        .count();
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            plural(total_problems, "problem", "problems"),
            total_errors,
            plural(total_errors, "error", "errors").red(),
            total_warnings,
            plural(total_warnings, "warning", "warnings").yellow()
        );
    }
}

fn extract_location_info<'a>(
    loc: &'a ReportLocation<'a>,
) -> (&'a str, usize, usize, Option<&'a str>) {
    match loc {
        ReportLocation::Source(ctx) => (
            ctx.file_path(),
            ctx.line(),
            ctx.col(),
            Some(&ctx.source_line),
        ),
        ReportLocation::File { path } => (path, 0, 0, None),
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line()),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn compare_issues(a: &Issue, b: &Issue) -> std::cmp::Ordering {
    let a_loc = a.location();
    let b_loc = b.location();
    let (a_path, a_line, a_col, _) = extract_location_info(&a_loc);
    let (b_path, b_line, b_col, _) = extract_location_info(&b_loc);

    a_path
        .cmp(b_path)
        .then_with(|| a_line.cmp(&b_line))
        .then_with(|| a_col.cmp(&b_col))
}

// ============================================================
// Tests
// ============================================================
