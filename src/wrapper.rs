//! File orchestration: enumerate, transform, write back, report.
//!
//! Files are processed one at a time. A file that cannot be read, parsed or written
//! becomes an [`Issue`] and the run moves on; only enumeration failures (a bad glob)
//! end the run early.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{Mode, TransformConfig};
use crate::core::{
    backend::{Backend, SourceBackend},
    classify::TextClassifier,
    files::{find_source_files, relative_path},
    finalize::{CLIENT_DIRECTIVE, FinalizePlan, finalize_module},
    rewrite::WrapChange,
    rsc::{Detection, ModuleKind, detect_module_kind},
    transform::{TransformOptions, TransformOutcome, UnwrappedText, transform_tree},
};
use crate::issues::{
    Issue, ParseErrorIssue, ReadErrorIssue, UnwrappedTextIssue, WriteErrorIssue,
};
use crate::perf::{FILE_SPAN, Metadata, Metric, PerformanceMonitor, TOTAL_SPAN, monitor_for};

/// Result of transforming one file's text.
#[derive(Debug, Default)]
pub struct FileResult {
    /// Rewritten text, present only when something was wrapped.
    pub output: Option<String>,
    pub changes: Vec<WrapChange>,
    pub unwrapped: Vec<UnwrappedText>,
    /// Module-level additions (imports, directive).
    pub finalized: Vec<String>,
    /// Client/server classification, in `auto` mode.
    pub detection: Option<Detection>,
}

impl FileResult {
    pub fn is_modified(&self) -> bool {
        self.output.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetection {
    pub file_path: String,
    #[serde(flatten)]
    pub detection: Detection,
}

/// Aggregate of one run.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Files that were rewritten (or would be, in a dry run).
    pub processed_files: Vec<String>,
    pub files_scanned: usize,
    pub changes: Vec<WrapChange>,
    pub issues: Vec<Issue>,
    pub detections: Vec<FileDetection>,
    pub metrics: Vec<Metric>,
    pub dry_run: bool,
}

impl RunResult {
    pub fn failed_files(&self) -> usize {
        self.issues.iter().filter(|i| i.is_file_failure()).count()
    }
}

pub struct TranslationWrapper {
    config: TransformConfig,
    classifier: TextClassifier,
    backend: Backend,
    monitor: Box<dyn PerformanceMonitor>,
}

impl TranslationWrapper {
    pub fn new(config: TransformConfig) -> Result<Self> {
        let classifier = TextClassifier::new(&config.target_script)?;
        let backend = Backend::from(config.parser_type);
        let monitor = monitor_for(config.enable_performance_monitoring);
        Ok(Self {
            config,
            classifier,
            backend,
            monitor,
        })
    }

    pub fn with_monitor(mut self, monitor: Box<dyn PerformanceMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Transform one file's text. Nothing is read or written.
    pub fn process_source(&self, path: &str, source: String) -> Result<FileResult> {
        let mut tree = self.backend.parse(path, source)?;

        let detection = (self.config.mode == Some(Mode::Auto))
            .then(|| detect_module_kind(path, &tree.module));
        let mode = match &detection {
            Some(d) => {
                log::debug!(
                    "{}: classified as {} ({}%)",
                    path,
                    d.kind,
                    d.confidence
                );
                Some(match d.kind {
                    ModuleKind::Client => Mode::Client,
                    ModuleKind::Server => Mode::Server,
                })
            }
            None => self.config.mode,
        };

        let options = TransformOptions {
            classifier: &self.classifier,
            ignore_marker: &self.config.ignore_marker,
            client_hook: &self.config.client_translation_hook,
            server_fn: &self.config.server_translation_function,
            mode,
        };
        let outcome = transform_tree(&mut tree, &options)?;

        let mut result = FileResult {
            detection,
            ..FileResult::default()
        };
        if outcome.modified {
            let plan = self.finalize_plan(mode, &outcome);
            result.finalized = finalize_module(&mut tree, &plan);
            result.output = Some(self.backend.print(tree)?);
        }
        result.changes = outcome.changes;
        result.unwrapped = outcome.unwrapped;
        Ok(result)
    }

    fn finalize_plan(&self, mode: Option<Mode>, outcome: &TransformOutcome) -> FinalizePlan {
        let mut imports = Vec::new();
        if outcome.client_injected {
            imports.push((
                self.config.client_translation_hook.clone(),
                self.config.translation_import_source.clone(),
            ));
        }
        if outcome.server_injected {
            imports.push((
                self.config.server_translation_function.clone(),
                self.config.server_translation_import_source.clone(),
            ));
        }
        let directive = (mode == Some(Mode::Client) && self.config.requires_client_directive())
            .then(|| CLIENT_DIRECTIVE.to_string());
        FinalizePlan { directive, imports }
    }

    /// Process every matching file in order. Per-file failures are collected as issues.
    pub fn process_files(&mut self) -> Result<RunResult> {
        let root = self.config.root.clone();
        let files = find_source_files(&root, &self.config.source_pattern, &self.config.ignores)?;
        log::info!(
            "found {} files matching {}",
            files.len(),
            self.config.source_pattern
        );

        self.monitor.start(
            TOTAL_SPAN,
            Metadata::from([("pattern".to_string(), self.config.source_pattern.clone())]),
        );

        let mut result = RunResult {
            files_scanned: files.len(),
            dry_run: self.config.dry_run,
            ..RunResult::default()
        };
        for path in &files {
            let rel = relative_path(&root, path);
            self.monitor.start(
                FILE_SPAN,
                Metadata::from([("file_path".to_string(), rel.clone())]),
            );
            let (modified, failed) = self.process_file(path, &rel, &mut result);
            self.monitor.end(
                FILE_SPAN,
                Metadata::from([
                    ("modified".to_string(), modified.to_string()),
                    ("error".to_string(), failed.to_string()),
                ]),
            );
        }

        self.monitor.end(
            TOTAL_SPAN,
            Metadata::from([("files".to_string(), files.len().to_string())]),
        );
        result.metrics = self.monitor.flush();
        Ok(result)
    }

    /// Returns `(modified, failed)`.
    fn process_file(&self, path: &Path, rel: &str, result: &mut RunResult) -> (bool, bool) {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                log::warn!("failed to read {}: {}", rel, err);
                result.issues.push(Issue::ReadError(ReadErrorIssue {
                    file_path: rel.to_string(),
                    error: err.to_string(),
                }));
                return (false, true);
            }
        };

        let file = match self.process_source(rel, source) {
            Ok(file) => file,
            Err(err) => {
                log::warn!("failed to process {}: {:#}", rel, err);
                result.issues.push(Issue::ParseError(ParseErrorIssue {
                    file_path: rel.to_string(),
                    error: root_message(&err),
                }));
                return (false, true);
            }
        };

        if let Some(detection) = &file.detection {
            result.detections.push(FileDetection {
                file_path: rel.to_string(),
                detection: detection.clone(),
            });
        }
        result
            .issues
            .extend(file.unwrapped.into_iter().map(|u| {
                Issue::UnwrappedText(UnwrappedTextIssue {
                    context: u.context,
                    text: u.text,
                })
            }));

        let Some(output) = file.output else {
            return (false, false);
        };
        if !self.config.dry_run {
            if let Err(err) = fs::write(path, &output) {
                log::warn!("failed to write {}: {}", rel, err);
                result.issues.push(Issue::WriteError(WriteErrorIssue {
                    file_path: rel.to_string(),
                    error: err.to_string(),
                }));
                return (false, true);
            }
            log::debug!("wrote {}", rel);
        }
        for added in &file.finalized {
            log::debug!("{}: added {}", rel, added);
        }
        result.processed_files.push(rel.to_string());
        result.changes.extend(file.changes);
        (true, false)
    }

    /// Run the whole batch off the async executor. Files are still processed one at a
    /// time.
    pub async fn run(mut self) -> Result<RunResult> {
        tokio::task::spawn_blocking(move || self.process_files())
            .await
            .context("Translation wrapper task failed")?
    }
}

/// Innermost cause, which carries the parser's message and position.
pub(crate) fn root_message(err: &anyhow::Error) -> String {
    err.root_cause().to_string()
}
