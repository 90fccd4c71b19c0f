//! Read-modify-write access to a flat locale file (`locales/<lang>.json`).
//!
//! Keys are source text and may contain dots, so they are stored verbatim at the top level
//! rather than split into nested objects. Existing entries keep their order and new ones
//! are appended.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

/// What happened to a key on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Added,
    Updated,
    Kept,
}

impl KeyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAction::Added => "added",
            KeyAction::Updated => "updated",
            KeyAction::Kept => "kept",
        }
    }
}

pub struct JsonWriter {
    file_path: PathBuf,
    data: Map<String, Value>,
}

impl JsonWriter {
    /// Load `path`, or start empty when it does not exist.
    ///
    /// A file that is not valid JSON is logged and replaced on save. A valid file whose root
    /// is not an object is an error, since overwriting it would lose data.
    pub fn open_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::empty(path));
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let data = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => bail!("{} does not contain a JSON object", path.display()),
            Err(err) => {
                log::warn!(
                    "failed to parse existing {} ({}), it will be overwritten",
                    path.display(),
                    err
                );
                Map::new()
            }
        };

        Ok(Self {
            file_path: path.to_path_buf(),
            data,
        })
    }

    /// Start from nothing, ignoring whatever `path` currently holds.
    pub fn empty(path: &Path) -> Self {
        Self {
            file_path: path.to_path_buf(),
            data: Map::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Set `key`, overwriting any existing value.
    pub fn add_value(&mut self, key: &str, value: Value) -> KeyAction {
        match self.data.insert(key.to_string(), value) {
            Some(_) => KeyAction::Updated,
            None => KeyAction::Added,
        }
    }

    /// Set `key` only when it is absent. Existing translations are never touched.
    pub fn add_missing(&mut self, key: &str, value: Value) -> KeyAction {
        if self.data.contains_key(key) {
            return KeyAction::Kept;
        }
        self.data.insert(key.to_string(), value);
        KeyAction::Added
    }

    /// The text `save` would write.
    pub fn render(&self) -> Result<String> {
        let content = serde_json::to_string_pretty(&self.data)
            .with_context(|| format!("Failed to serialize {}", self.file_path.display()))?;
        Ok(content + "\n")
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&self.file_path, self.render()?)
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;
        Ok(())
    }
}
