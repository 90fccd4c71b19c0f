//! Locale cleanup (`twrap clean`).
//!
//! Rebuilds every `<lang>.json` from the keys the source still uses. A key is dropped when
//! no `t(...)` call uses it, or when its default-language value is a placeholder such as
//! `""` or `N/A`. Used keys absent from the default-language file are reported, not added.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Result, bail};
use serde::Serialize;
use serde_json::Value;

use crate::extract::ExtractedKey;
use crate::json_writer::JsonWriter;

/// Default-language values treated as "not translated yet".
pub const INVALID_VALUES: &[&str] = &["", "N/A", "_N/A"];

#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub languages: Vec<String>,
    pub default_language: String,
    pub locales_dir: PathBuf,
    pub dry_run: bool,
    /// Copy each existing file to `<lang>.backup-<millis>.json` before overwriting it.
    pub backup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanedFile {
    pub path: PathBuf,
    pub keys_before: usize,
    pub keys_after: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
    pub written: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanReport {
    pub used_keys: usize,
    pub kept: Vec<String>,
    /// In the default-language file but used nowhere.
    pub unused: Vec<String>,
    /// Used, but the default-language value is a placeholder.
    pub invalid_value: Vec<String>,
    /// Used, but absent from the default-language file.
    pub missing: Vec<String>,
    pub files: Vec<CleanedFile>,
}

impl CleanReport {
    pub fn removed(&self) -> usize {
        self.unused.len() + self.invalid_value.len()
    }
}

pub fn is_valid_value(value: &Value) -> bool {
    match value {
        Value::String(s) => !INVALID_VALUES.contains(&s.as_str()),
        _ => false,
    }
}

/// `locales/ko.json` becomes `locales/ko.backup-<stamp>.json`.
pub fn backup_path(path: &Path, stamp: u128) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!("{}.backup-{}.json", stem, stamp))
}

pub fn clean_locales(keys: &[ExtractedKey], options: &CleanOptions) -> Result<CleanReport> {
    let locales = options
        .languages
        .iter()
        .map(|lang| {
            JsonWriter::open_or_create(&options.locales_dir.join(format!("{}.json", lang)))
        })
        .collect::<Result<Vec<_>>>()?;
    let Some(primary) = options
        .languages
        .iter()
        .position(|lang| *lang == options.default_language)
        .map(|index| &locales[index])
    else {
        bail!(
            "defaultLanguage \"{}\" is not one of the configured languages",
            options.default_language
        );
    };

    let mut report = CleanReport {
        used_keys: keys.len(),
        ..CleanReport::default()
    };
    for key in keys {
        match primary.get(&key.key) {
            None => report.missing.push(key.key.clone()),
            Some(value) if !is_valid_value(value) => report.invalid_value.push(key.key.clone()),
            Some(_) => report.kept.push(key.key.clone()),
        }
    }
    let used: BTreeSet<&str> = keys.iter().map(|k| k.key.as_str()).collect();
    report.unused = primary
        .keys()
        .filter(|key| !used.contains(key))
        .map(str::to_string)
        .collect();

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();

    for original in &locales {
        let mut cleaned = JsonWriter::empty(original.path());
        for key in &report.kept {
            let value = original
                .get(key)
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()));
            cleaned.add_value(key, value);
        }

        let mut file = CleanedFile {
            path: original.path().to_path_buf(),
            keys_before: original.len(),
            keys_after: cleaned.len(),
            backup: None,
            written: false,
        };
        if options.dry_run {
            report.files.push(file);
            continue;
        }

        if options.backup && file.path.exists() {
            let target = backup_path(&file.path, stamp);
            match fs::copy(&file.path, &target) {
                Ok(_) => file.backup = Some(target),
                Err(err) => log::warn!("failed to back up {}: {}", file.path.display(), err),
            }
        }
        cleaned.save()?;
        file.written = true;
        report.files.push(file);
    }

    log::info!(
        "kept {} keys, removed {} unused and {} with invalid values",
        report.kept.len(),
        report.unused.len(),
        report.invalid_value.len()
    );
    Ok(report)
}
