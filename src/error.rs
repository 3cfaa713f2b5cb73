//! Error types for hookwrap.
//!
//! Only environment and configuration problems are errors. A tool that finds
//! diagnostics or would reformat a file is reported through a nonzero
//! [`CommandResult::exit_code`](crate::command::CommandResult), never here.

use crate::config::ConfigError;
use crate::exit_codes;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Problems detected before the wrapped tool ever runs.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Problem with {tool}: Missing arguments\nNo file arguments found and no files are pending commit.")]
    NoFiles { tool: String },

    #[error("Problem with {name}: Unsupported tool\nSupported tools: {supported}")]
    UnsupportedTool { name: String, supported: String },

    #[error("Problem with {tool}: Missing value for {flag}\nPass it as `{flag}=<value>` or `{flag} <value>`.")]
    MissingFlagValue { tool: String, flag: String },

    #[error(
        "Problem with {tool}: Version of {tool} doesn't match!\nExpected version: {expected}\nActual version: {actual}\nUpdate the version in the pre-commit config or install the expected version."
    )]
    VersionMismatch {
        tool: String,
        expected: String,
        actual: String,
    },

    #[error("Problem with {tool}: Unable to determine version\n`{tool} --version` printed: {banner}")]
    VersionUnknown { tool: String, banner: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Fatal errors that abort a single invocation.
#[derive(Debug, Error)]
pub enum HookError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Problem with {tool}: {tool} not found\nMake sure {tool} is installed and on your PATH. ({source})")]
    ToolNotFound {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("Problem with {tool}: {context}: {source}")]
    Io {
        tool: String,
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Problem with {tool}: timed out after {timeout_ms}ms")]
    Timeout { tool: String, timeout_ms: u64 },

    #[error("Problem with {tool}: File {} could not be re-read after formatting\n{source}", .path.display())]
    DiffComputation {
        tool: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HookError {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => exit_codes::CONFIG_ERROR,
            Self::ToolNotFound { .. } => exit_codes::TOOL_NOT_FOUND,
            Self::Io { .. } | Self::DiffComputation { .. } => exit_codes::IO_ERROR,
            Self::Timeout { .. } => exit_codes::INTERNAL_ERROR,
        }
    }
}

impl From<ConfigError> for HookError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(ConfigurationError::Config(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_from_violations() {
        let errors = [
            HookError::from(ConfigurationError::NoFiles {
                tool: "cppcheck".to_string(),
            }),
            HookError::ToolNotFound {
                tool: "cppcheck".to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
            HookError::Timeout {
                tool: "cppcheck".to_string(),
                timeout_ms: 5,
            },
            HookError::DiffComputation {
                tool: "clang-format".to_string(),
                path: PathBuf::from("gone.c"),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        ];

        for err in &errors {
            assert_ne!(err.exit_code(), exit_codes::SUCCESS);
            assert_ne!(err.exit_code(), exit_codes::VIOLATIONS_FOUND);
        }
    }

    #[test]
    fn test_no_files_message() {
        let err = ConfigurationError::NoFiles {
            tool: "clang-format".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Problem with clang-format: Missing arguments\nNo file arguments found and no files are pending commit."
        );
    }

    #[test]
    fn test_version_mismatch_message() {
        let err = ConfigurationError::VersionMismatch {
            tool: "clang-tidy".to_string(),
            expected: "9".to_string(),
            actual: "14.0.6".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Problem with clang-tidy: Version of clang-tidy doesn't match!"));
        assert!(msg.contains("Expected version: 9\nActual version: 14.0.6"));
    }
}
