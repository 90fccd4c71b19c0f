//! Locale JSON files, the `index.ts` aggregator and the CSV sheet.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::ExtractedKey;
use crate::json_writer::{JsonWriter, KeyAction};

pub const CSV_FILE_NAME: &str = "extracted-translations.csv";
pub const INDEX_FILE_NAME: &str = "index.ts";
const CSV_HEADER: &str = "Key,English,Korean";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub languages: Vec<String>,
    pub default_language: String,
    pub output_dir: PathBuf,
    /// Rebuild locale files from the extracted keys instead of merging.
    pub force: bool,
    pub dry_run: bool,
}

/// A file produced (or, in a dry run, previewed) by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFile {
    pub path: PathBuf,
    /// Keys added to the file; every row for CSV.
    pub added_keys: usize,
    pub content: String,
    pub written: bool,
}

/// Quote a CSV field when it contains a delimiter, quote or line break.
pub fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One row per key: the key, an empty English column, the source-language value.
pub fn render_csv(keys: &[ExtractedKey]) -> String {
    let mut lines = vec![CSV_HEADER.to_string()];
    lines.extend(keys.iter().map(|k| {
        format!("{},,{}", escape_csv(&k.key), escape_csv(k.source_value()))
    }));
    lines.join("\n") + "\n"
}

pub fn render_index(languages: &[String]) -> String {
    let imports = languages
        .iter()
        .map(|lang| format!("import {lang} from \"./{lang}.json\";"))
        .collect::<Vec<_>>()
        .join("\n");
    let entries = languages
        .iter()
        .map(|lang| format!("  {lang}: {lang},"))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{imports}\n\nexport const translations = {{\n{entries}\n}};\n")
}

/// Merge `keys` into the locale file for `language`.
///
/// The default language gets each key's source value, every other language an empty
/// string. Returns the writer and the number of keys added.
pub fn locale_writer(
    keys: &[ExtractedKey],
    language: &str,
    options: &OutputOptions,
) -> Result<(JsonWriter, usize)> {
    let path = options.output_dir.join(format!("{}.json", language));
    let mut writer = if options.force {
        log::info!("rebuilding {} from extracted keys", path.display());
        JsonWriter::empty(&path)
    } else {
        JsonWriter::open_or_create(&path)?
    };

    let mut added = 0;
    for key in keys {
        let value = if language == options.default_language {
            key.source_value()
        } else {
            ""
        };
        if writer.add_missing(&key.key, Value::String(value.to_string())) == KeyAction::Added {
            added += 1;
        }
    }
    Ok((writer, added))
}

/// Produce the output files for `options.format`, writing them unless this is a dry run.
pub fn write_outputs(keys: &[ExtractedKey], options: &OutputOptions) -> Result<Vec<OutputFile>> {
    let mut files = Vec::new();

    match options.format {
        OutputFormat::Csv => {
            files.push(OutputFile {
                path: options.output_dir.join(CSV_FILE_NAME),
                added_keys: keys.len(),
                content: render_csv(keys),
                written: false,
            });
        }
        OutputFormat::Json => {
            for language in &options.languages {
                let (writer, added) = locale_writer(keys, language, options)?;
                if added == 0 && !options.force {
                    log::info!("no new keys for {}", writer.path().display());
                }
                files.push(OutputFile {
                    path: writer.path().to_path_buf(),
                    added_keys: added,
                    content: writer.render()?,
                    written: false,
                });
            }
            files.push(OutputFile {
                path: options.output_dir.join(INDEX_FILE_NAME),
                added_keys: 0,
                content: render_index(&options.languages),
                written: false,
            });
        }
    }

    if options.dry_run {
        return Ok(files);
    }

    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "Failed to create directory {}",
            options.output_dir.display()
        )
    })?;
    for file in &mut files {
        write_file(&file.path, &file.content)?;
        file.written = true;
    }
    Ok(files)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
