//! Runtime configuration: `beyond.toml` plus command-line overrides.
//!
//! ```toml
//! [runtime]
//! key_attempts = 3
//!
//! [output]
//! pretty = true
//!
//! [app]
//! name = "filters"
//! todos = ["Learn Rust", "Ship it"]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::apps::AppKind;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "beyond.toml";

pub const DEFAULT_TODOS: &[&str] = &["Learn Rust"];

/// Parsed config file. Every section and field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub runtime: RuntimeSection,
    pub output: OutputSection,
    pub app: AppSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeSection {
    /// Key draws per callback before a render fails
    pub key_attempts: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    /// Pretty-print JSON responses
    pub pretty: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppSection {
    pub name: Option<AppKind>,
    /// Initial todo texts
    pub todos: Option<Vec<String>>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML format")
    }

    /// Load `explicit`, or `beyond.toml` in the working directory if present.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file just means defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default.is_file() {
            let config = Self::from_file(&default)?;
            return Ok((config, Some(default)));
        }
        Ok((Self::default(), None))
    }
}

/// Values given on the command line; `None` defers to the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub app: Option<AppKind>,
    pub pretty: Option<bool>,
    pub key_attempts: Option<u32>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub app: AppKind,
    pub todos: Vec<String>,
    pub pretty: bool,
    pub key_attempts: u32,
}

impl Config {
    pub fn resolve(file: FileConfig, overrides: &Overrides) -> Self {
        Self {
            app: overrides.app.or(file.app.name).unwrap_or(AppKind::Todo),
            todos: file
                .app
                .todos
                .unwrap_or_else(|| DEFAULT_TODOS.iter().map(|t| t.to_string()).collect()),
            pretty: overrides.pretty.or(file.output.pretty).unwrap_or(false),
            key_attempts: overrides
                .key_attempts
                .or(file.runtime.key_attempts)
                .unwrap_or(beyond::KeyAllocator::DEFAULT_ATTEMPTS),
        }
    }
}
