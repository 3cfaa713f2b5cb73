//! Configuration for hookwrap.
//!
//! This module defines the configuration structures and loading logic for hookwrap.
//! Configuration is read from `.hookwrap.toml` (or `hookwrap.toml`), discovered by
//! walking up from the working directory until a `.git` directory is reached.

use crate::tools::Tool;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Config file names, in order of precedence within one directory.
pub const CONFIG_FILES: &[&str] = &[".hookwrap.toml", "hookwrap.toml"];

const MAX_DEPTH: usize = 100;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Settings shared by every tool
    #[serde(default)]
    pub global: GlobalConfig,

    /// Per-tool overrides, keyed by tool name (e.g. `clang-format`)
    #[serde(default)]
    pub tools: BTreeMap<String, ToolConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GlobalConfig {
    /// Directory holding `compile_commands.json`, produced outside hookwrap.
    /// Passed as `-p <dir>` to tools that accept a compilation database.
    #[serde(default)]
    pub compilation_database: Option<PathBuf>,

    /// Timeout in milliseconds for diagnostic-only tools (0 = wait forever).
    /// Formatters are never interrupted once started.
    #[serde(default)]
    pub timeout: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ToolConfig {
    /// Executable to run instead of the tool's own name
    #[serde(default)]
    pub binary: Option<String>,

    /// Required version prefix, same as passing `--version=<v>` to the hook
    #[serde(default)]
    pub version: Option<String>,

    /// Flags added to every invocation unless the hook args already set them
    #[serde(default)]
    pub args: Vec<String>,
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the TOML content
    #[error("Failed to parse config file at {path}: {message}")]
    ParseError { path: String, message: String },

    /// A `[tools.<name>]` table names a tool hookwrap does not wrap
    #[error("Unknown tool '{name}' in config file at {path}")]
    UnknownTool { name: String, path: String },
}

impl Config {
    /// Load configuration from an explicit path, or discover it from the
    /// current directory when `config_path` is `None`.
    ///
    /// Returns the default configuration when nothing is found.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => {
                let start = std::env::current_dir().map_err(|source| ConfigError::IoError {
                    source,
                    path: ".".to_string(),
                })?;
                match Self::discover_from(&start) {
                    Some(path) => Self::from_file(&path),
                    None => {
                        log::debug!("[hookwrap-config] No config file found, using defaults");
                        Ok(Self::default())
                    }
                }
            }
        }
    }

    /// Read and validate a single config file.
    ///
    /// A relative `compilation-database` is resolved against the directory
    /// containing the config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display_path = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: display_path.clone(),
        })?;

        let mut config = Self::parse(&content, &display_path)?;

        if let Some(db) = config.global.compilation_database.as_mut()
            && db.is_relative()
            && let Some(parent) = path.parent()
        {
            *db = parent.join(&*db);
        }

        log::debug!("[hookwrap-config] Loaded config from {display_path}");
        Ok(config)
    }

    /// Parse TOML content. `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })?;

        if let Some(name) = config.tools.keys().find(|name| name.parse::<Tool>().is_err()) {
            return Err(ConfigError::UnknownTool {
                name: name.clone(),
                path: origin.to_string(),
            });
        }

        Ok(config)
    }

    /// Discover a config file by traversing up from `start_dir`.
    /// Stops after checking the first directory that contains `.git`.
    pub fn discover_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = start_dir.to_path_buf();

        for _ in 0..MAX_DEPTH {
            log::debug!("[hookwrap-config] Searching for config in: {}", current_dir.display());

            for config_name in CONFIG_FILES {
                let config_path = current_dir.join(config_name);
                if config_path.is_file() {
                    log::debug!("[hookwrap-config] Found config file: {}", config_path.display());
                    return Some(config_path);
                }
            }

            if current_dir.join(".git").exists() {
                log::debug!("[hookwrap-config] Stopping at .git directory");
                return None;
            }

            match current_dir.parent() {
                Some(parent) => current_dir = parent.to_path_buf(),
                None => return None,
            }
        }

        log::debug!("[hookwrap-config] Maximum traversal depth reached");
        None
    }

    /// Overrides for one tool, if configured.
    pub fn tool(&self, tool: Tool) -> Option<&ToolConfig> {
        self.tools.get(tool.name())
    }

    /// Executable name or path for `tool`.
    pub fn binary_for(&self, tool: Tool) -> String {
        self.tool(tool)
            .and_then(|t| t.binary.clone())
            .unwrap_or_else(|| tool.name().to_string())
    }
}
