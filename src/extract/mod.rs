//! Translation key extraction (`twrap extract`).
//!
//! Collects the string keys passed to `t(...)` and `<obj>.t(...)` across the source tree,
//! then hands them to [`output`] to write locale files or a CSV sheet, or to [`clean`] to
//! prune locale files down to the keys still in use.

pub mod clean;
pub mod output;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use swc_ecma_ast::{CallExpr, Expr, ExprOrSpread, Lit, Prop, PropName, PropOrSpread};
use swc_ecma_visit::{Visit, VisitWith};

use crate::config::Config;
use crate::core::{
    backend::{Backend, SourceBackend, SourceText},
    classify::is_translation_callee,
    context::SourceLocation,
    files::{find_source_files, relative_path},
};
use crate::issues::{Issue, ParseErrorIssue, ReadErrorIssue};
use crate::wrapper::root_message;

const DEFAULT_VALUE_PROP: &str = "defaultValue";

/// A key found in a translation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedKey {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// First place the key was seen.
    pub location: SourceLocation,
}

impl ExtractedKey {
    /// Value for the default language: `defaultValue` when given, else the key itself.
    pub fn source_value(&self) -> &str {
        match self.default_value.as_deref() {
            Some(value) if !value.is_empty() => value,
            _ => &self.key,
        }
    }
}

#[derive(Debug, Default)]
pub struct Extraction {
    /// Unique keys, sorted.
    pub keys: Vec<ExtractedKey>,
    pub files_scanned: usize,
    /// Calls whose key had already been seen.
    pub duplicates: usize,
    pub issues: Vec<Issue>,
}

impl Extraction {
    /// Files that could not be read or parsed, so their keys are unknown.
    pub fn scan_failures(&self) -> usize {
        self.issues.iter().filter(|i| i.is_file_failure()).count()
    }
}

pub struct KeyExtractor {
    root: PathBuf,
    source_pattern: String,
    ignores: Vec<String>,
    backend: Backend,
}

impl KeyExtractor {
    pub fn new(config: &Config, root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            source_pattern: config.source_pattern.clone(),
            ignores: config.ignores.clone(),
            backend: Backend::from(config.parser_type),
        }
    }

    /// Keys in one file's text, in source order, duplicates included.
    pub fn extract_source(&self, path: &str, source: String) -> Result<Vec<ExtractedKey>> {
        let tree = self.backend.parse(path, source)?;
        let mut collector = KeyCollector {
            source: &tree.source,
            keys: Vec::new(),
        };
        tree.module.visit_with(&mut collector);
        Ok(collector.keys)
    }

    pub fn extract(&self) -> Result<Extraction> {
        let files = find_source_files(&self.root, &self.source_pattern, &self.ignores)?;
        log::info!(
            "extracting keys from {} files matching {}",
            files.len(),
            self.source_pattern
        );

        let mut extraction = Extraction {
            files_scanned: files.len(),
            ..Extraction::default()
        };
        let mut unique = BTreeMap::new();

        for path in &files {
            let rel = relative_path(&self.root, path);
            let source = match fs::read_to_string(path) {
                Ok(source) => source,
                Err(err) => {
                    log::warn!("failed to read {}: {}", rel, err);
                    extraction.issues.push(Issue::ReadError(ReadErrorIssue {
                        file_path: rel,
                        error: err.to_string(),
                    }));
                    continue;
                }
            };

            let keys = match self.extract_source(&rel, source) {
                Ok(keys) => keys,
                Err(err) => {
                    log::warn!("failed to parse {}: {:#}", rel, err);
                    extraction.issues.push(Issue::ParseError(ParseErrorIssue {
                        file_path: rel,
                        error: root_message(&err),
                    }));
                    continue;
                }
            };

            for key in keys {
                if unique.contains_key(&key.key) {
                    log::debug!("duplicate key \"{}\" at {}", key.key, key.location);
                    extraction.duplicates += 1;
                    continue;
                }
                unique.insert(key.key.clone(), key);
            }
        }

        extraction.keys = unique.into_values().collect();
        Ok(extraction)
    }
}

struct KeyCollector<'a> {
    source: &'a SourceText,
    keys: Vec<ExtractedKey>,
}

impl Visit for KeyCollector<'_> {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if is_translation_callee(&call.callee)
            && let Some(key) = call.args.first().and_then(string_arg)
        {
            self.keys.push(ExtractedKey {
                key: key.to_string(),
                default_value: call.args.get(1).and_then(default_value).map(str::to_string),
                location: self.source.location(call.span.lo),
            });
        }
        call.visit_children_with(self);
    }
}

fn string_arg(arg: &ExprOrSpread) -> Option<&str> {
    if arg.spread.is_some() {
        return None;
    }
    match &*arg.expr {
        Expr::Lit(Lit::Str(s)) => s.value.as_str(),
        _ => None,
    }
}

/// `defaultValue` from an options object such as `{ defaultValue: "..." }`.
fn default_value(arg: &ExprOrSpread) -> Option<&str> {
    let Expr::Object(object) = &*arg.expr else {
        return None;
    };
    object.props.iter().find_map(|prop| {
        let PropOrSpread::Prop(prop) = prop else {
            return None;
        };
        let Prop::KeyValue(kv) = &**prop else {
            return None;
        };
        match &kv.key {
            PropName::Ident(name) if &*name.sym == DEFAULT_VALUE_PROP => match &*kv.value {
                Expr::Lit(Lit::Str(s)) => s.value.as_str(),
                _ => None,
            },
            _ => None,
        }
    })
}
