use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::super::args::CommonArgs;
use crate::config::{Config, load_config};

/// Project root and its configuration, with the shared CLI overrides applied.
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
    pub from_file: bool,
}

pub fn load_project(common: &CommonArgs) -> Result<Project> {
    let root = match &common.path {
        Some(path) => path.clone(),
        None => env::current_dir().context("Failed to determine the current directory")?,
    };

    let loaded = load_config(&root)?;
    let mut config = loaded.config;
    if let Some(pattern) = &common.pattern {
        config.source_pattern = pattern.clone();
    }
    config.validate()?;

    Ok(Project {
        root,
        config,
        from_file: loaded.from_file,
    })
}
