use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use clap::ValueEnum;
use glob::Pattern;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::files::expand_braces;

pub const CONFIG_FILE_NAME: &str = "i18nexus.config.json";

/// Default target-script test: any Hangul syllable.
pub const DEFAULT_TARGET_SCRIPT: &str = "[가-힣]";

/// Which translation binding a transformed component receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Always inject the client hook.
    Client,
    /// Always inject the awaited server function.
    Server,
    /// Classify every file as a client or server module first.
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Nextjs,
    React,
    Other,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ParserType {
    #[default]
    Typescript,
    Ecmascript,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_pattern")]
    pub source_pattern: String,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_translation_import_source")]
    pub translation_import_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_translation_import_source: Option<String>,
    #[serde(default = "default_client_translation_hook")]
    pub client_translation_hook: String,
    #[serde(default = "default_server_translation_function")]
    pub server_translation_function: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<Framework>,
    #[serde(default)]
    pub parser_type: ParserType,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_target_script")]
    pub target_script: String,
    #[serde(default = "default_ignore_marker")]
    pub ignore_marker: String,
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default = "default_default_language")]
    pub default_language: String,
    #[serde(default = "default_locales_dir")]
    pub locales_dir: String,
    #[serde(default = "default_enable_performance_monitoring")]
    pub enable_performance_monitoring: bool,
}

fn default_source_pattern() -> String {
    "src/**/*.{js,jsx,ts,tsx}".to_string()
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_translation_import_source() -> String {
    "i18nexus".to_string()
}

fn default_client_translation_hook() -> String {
    "useTranslation".to_string()
}

fn default_server_translation_function() -> String {
    "getServerTranslation".to_string()
}

fn default_target_script() -> String {
    DEFAULT_TARGET_SCRIPT.to_string()
}

fn default_ignore_marker() -> String {
    "i18n-ignore".to_string()
}

fn default_languages() -> Vec<String> {
    ["en", "ko"].map(String::from).to_vec()
}

fn default_default_language() -> String {
    "ko".to_string()
}

fn default_locales_dir() -> String {
    "./locales".to_string()
}

fn default_enable_performance_monitoring() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_pattern: default_source_pattern(),
            ignores: default_ignores(),
            translation_import_source: default_translation_import_source(),
            server_translation_import_source: None,
            client_translation_hook: default_client_translation_hook(),
            server_translation_function: default_server_translation_function(),
            mode: None,
            framework: None,
            parser_type: ParserType::default(),
            dry_run: false,
            target_script: default_target_script(),
            ignore_marker: default_ignore_marker(),
            languages: default_languages(),
            default_language: default_default_language(),
            locales_dir: default_locales_dir(),
            enable_performance_monitoring: default_enable_performance_monitoring(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if a glob pattern, the target-script regex or a symbol name is unusable.
    pub fn validate(&self) -> Result<()> {
        for pattern in expand_braces(&self.source_pattern) {
            Pattern::new(&pattern).with_context(|| {
                format!(
                    "Invalid glob pattern in 'sourcePattern': \"{}\"",
                    self.source_pattern
                )
            })?;
        }

        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        Regex::new(&self.target_script).with_context(|| {
            format!(
                "Invalid regular expression in 'targetScript': \"{}\"",
                self.target_script
            )
        })?;

        if self.ignore_marker.trim().is_empty() {
            bail!("'ignoreMarker' must not be empty");
        }

        for (field, value) in [
            ("translationImportSource", &self.translation_import_source),
            ("clientTranslationHook", &self.client_translation_hook),
            ("serverTranslationFunction", &self.server_translation_function),
        ] {
            if value.trim().is_empty() {
                bail!("'{}' must not be empty", field);
            }
        }

        if !self.languages.contains(&self.default_language) {
            bail!(
                "'defaultLanguage' \"{}\" is not listed in 'languages'",
                self.default_language
            );
        }

        Ok(())
    }

    /// Resolve the immutable settings the transformer runs with.
    pub fn to_transform_config(&self, root: &Path) -> TransformConfig {
        TransformConfig {
            root: root.to_path_buf(),
            source_pattern: self.source_pattern.clone(),
            ignores: self.ignores.clone(),
            translation_import_source: self.translation_import_source.clone(),
            server_translation_import_source: self
                .server_translation_import_source
                .clone()
                .unwrap_or_else(|| self.translation_import_source.clone()),
            client_translation_hook: self.client_translation_hook.clone(),
            server_translation_function: self.server_translation_function.clone(),
            mode: self.mode,
            framework: self.framework,
            dry_run: self.dry_run,
            parser_type: self.parser_type,
            target_script: self.target_script.clone(),
            ignore_marker: self.ignore_marker.clone(),
            enable_performance_monitoring: self.enable_performance_monitoring,
        }
    }
}

/// Settings for one wrapper run, resolved once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Directory the source pattern is resolved against.
    pub root: PathBuf,
    pub source_pattern: String,
    pub ignores: Vec<String>,
    pub translation_import_source: String,
    pub server_translation_import_source: String,
    pub client_translation_hook: String,
    pub server_translation_function: String,
    pub mode: Option<Mode>,
    pub framework: Option<Framework>,
    pub dry_run: bool,
    pub parser_type: ParserType,
    pub target_script: String,
    pub ignore_marker: String,
    pub enable_performance_monitoring: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Config::default().to_transform_config(Path::new("."))
    }
}

impl TransformConfig {
    /// Whether a client-mode file gets a leading `"use client"` directive.
    pub fn requires_client_directive(&self) -> bool {
        self.framework == Some(Framework::Nextjs)
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            log::debug!("loaded config from {}", path.display());
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
