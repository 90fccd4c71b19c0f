//! Performance monitoring, injected into the wrapper rather than held globally.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Span name wrapped around a whole run.
pub const TOTAL_SPAN: &str = "translation_wrapper:total";
/// Span name recorded once per file.
pub const FILE_SPAN: &str = "file_processing";

pub type Metadata = BTreeMap<String, String>;

/// A completed span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: String,
    pub duration: Duration,
    pub metadata: Metadata,
}

impl Metric {
    pub fn file_path(&self) -> Option<&str> {
        self.metadata.get("file_path").map(String::as_str)
    }
}

pub trait PerformanceMonitor: Send {
    fn start(&mut self, name: &str, metadata: Metadata);

    /// Close the span opened under `name`, merging `metadata` into the start metadata.
    fn end(&mut self, name: &str, metadata: Metadata);

    /// Hand over every completed span, leaving the monitor empty.
    fn flush(&mut self) -> Vec<Metric>;
}

/// Keeps completed spans in memory until flushed.
#[derive(Debug, Default)]
pub struct RecordingMonitor {
    open: HashMap<String, (Instant, Metadata)>,
    completed: Vec<Metric>,
}

impl RecordingMonitor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PerformanceMonitor for RecordingMonitor {
    fn start(&mut self, name: &str, metadata: Metadata) {
        self.open
            .insert(name.to_string(), (Instant::now(), metadata));
    }

    fn end(&mut self, name: &str, metadata: Metadata) {
        let Some((started, mut merged)) = self.open.remove(name) else {
            log::warn!("performance span {} ended without being started", name);
            return;
        };
        merged.extend(metadata);
        self.completed.push(Metric {
            name: name.to_string(),
            duration: started.elapsed(),
            metadata: merged,
        });
    }

    fn flush(&mut self) -> Vec<Metric> {
        std::mem::take(&mut self.completed)
    }
}

/// Used when monitoring is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMonitor;

impl PerformanceMonitor for NoopMonitor {
    fn start(&mut self, _: &str, _: Metadata) {}

    fn end(&mut self, _: &str, _: Metadata) {}

    fn flush(&mut self) -> Vec<Metric> {
        Vec::new()
    }
}

/// Monitor matching the `enablePerformanceMonitoring` setting.
pub fn monitor_for(enabled: bool) -> Box<dyn PerformanceMonitor> {
    if enabled {
        Box::new(RecordingMonitor::new())
    } else {
        Box::new(NoopMonitor)
    }
}

const SLOWEST_FILES: usize = 3;

/// Summary printed when a run completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    pub total: Duration,
    pub files_processed: usize,
    pub files_modified: usize,
    pub average_per_file: Duration,
    /// `(file path, duration)`, slowest first.
    pub slowest_files: Vec<(String, Duration)>,
}

impl CompletionReport {
    pub fn from_metrics(metrics: &[Metric]) -> Self {
        let total = metrics
            .iter()
            .find(|m| m.name == TOTAL_SPAN)
            .map(|m| m.duration)
            .unwrap_or_default();

        let mut files: Vec<&Metric> = metrics.iter().filter(|m| m.name == FILE_SPAN).collect();
        let files_modified = files
            .iter()
            .filter(|m| m.metadata.get("modified").is_some_and(|v| v == "true"))
            .count();
        let file_time: Duration = files.iter().map(|m| m.duration).sum();
        let average_per_file = match files.len() {
            0 => Duration::ZERO,
            n => file_time / n as u32,
        };

        files.sort_by(|a, b| b.duration.cmp(&a.duration));
        let slowest_files = files
            .iter()
            .take(SLOWEST_FILES)
            .map(|m| (m.file_path().unwrap_or("unknown").to_string(), m.duration))
            .collect();

        Self {
            total,
            files_processed: files.len(),
            files_modified,
            average_per_file,
            slowest_files,
        }
    }
}
