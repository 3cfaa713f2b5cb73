//! Hook argument classification and [`Invocation`] construction.
//!
//! pre-commit calls a hook as `entry + args + filenames`, so the raw argv
//! mixes the tool's flags with the files to check. Classification separates
//! them; everything hookwrap itself reacts to (`--no-diff`, `--version`, the
//! tools' own fix switches) is resolved here once, so later stages never
//! re-scan the flags.

use crate::config::Config;
use crate::error::ConfigurationError;
use crate::tools::{FlagEffect, Tool};
use std::path::{Path, PathBuf};

/// Suppresses diff text for formatters. Consumed, never forwarded.
pub const NO_DIFF_FLAG: &str = "--no-diff";

/// Pins the tool version. Consumed, never forwarded.
pub const VERSION_FLAG: &str = "--version";

/// Compiler arguments follow this separator for clang-based tools.
const ARG_SEPARATOR: &str = "--";

/// Raw hook arguments split into target files and everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub files: Vec<PathBuf>,
    pub flags: Vec<String>,
}

/// Split `args` into existing files and flags, preserving order.
///
/// The argument after a value-taking flag (e.g. uncrustify's `-c cfg`) is
/// always a flag value. Fails when no file is found.
pub fn classify(tool: Tool, args: &[String]) -> Result<Classified, ConfigurationError> {
    let spec = tool.spec();
    let mut files = Vec::new();
    let mut flags = Vec::new();
    let mut expecting_value = false;

    for arg in args {
        if expecting_value {
            expecting_value = false;
            flags.push(arg.clone());
            continue;
        }

        if arg == VERSION_FLAG || spec.takes_value(arg) {
            expecting_value = true;
            flags.push(arg.clone());
        } else if !arg.starts_with('-') && Path::new(arg).is_file() {
            files.push(PathBuf::from(arg));
        } else {
            flags.push(arg.clone());
        }
    }

    if files.is_empty() {
        return Err(ConfigurationError::NoFiles {
            tool: tool.name().to_string(),
        });
    }

    Ok(Classified { files, flags })
}

/// Behaviour switches resolved from the hook arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mode {
    pub no_diff: bool,
    pub in_place: bool,
    pub fix_errors: bool,
}

/// One request to run one tool against a set of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    tool: Tool,
    flags: Vec<String>,
    files: Vec<PathBuf>,
    mode: Mode,
    expected_version: Option<String>,
}

impl Invocation {
    pub fn new(tool: Tool, args: &[String], config: &Config) -> Result<Self, ConfigurationError> {
        let Classified { files, flags: raw_flags } = classify(tool, args)?;
        let spec = tool.spec();

        let mut mode = Mode::default();
        let mut expected_version = None;
        let mut flags = Vec::with_capacity(raw_flags.len());
        let mut iter = raw_flags.into_iter();

        while let Some(flag) = iter.next() {
            if flag == NO_DIFF_FLAG {
                mode.no_diff = true;
            } else if flag == VERSION_FLAG {
                let value = iter.next().ok_or_else(|| ConfigurationError::MissingFlagValue {
                    tool: tool.name().to_string(),
                    flag: VERSION_FLAG.to_string(),
                })?;
                expected_version = Some(value.trim().to_string());
            } else if let Some(value) = flag.strip_prefix("--version=") {
                expected_version = Some(value.trim().to_string());
            } else {
                match spec.effect_of(&flag) {
                    Some(FlagEffect::InPlace) => mode.in_place = true,
                    Some(FlagEffect::FixErrors) => mode.fix_errors = true,
                    None => {}
                }
                flags.push(flag);
            }
        }

        if matches!(expected_version.as_deref(), Some("")) {
            return Err(ConfigurationError::MissingFlagValue {
                tool: tool.name().to_string(),
                flag: VERSION_FLAG.to_string(),
            });
        }

        let tool_config = config.tool(tool);
        if expected_version.is_none() {
            expected_version = tool_config.and_then(|t| t.version.clone());
        }

        if let Some(tool_config) = tool_config {
            for group in flag_groups(&tool_config.args) {
                if has_flag_key(&flags, flag_key(&group[0])) {
                    log::debug!("[hookwrap] {tool}: hook args already set {}, ignoring config", group[0]);
                } else {
                    insert_before_separator(&mut flags, group.iter().cloned());
                }
            }
        }

        for default in spec.default_flags {
            if !has_flag_key(&flags, default.key) {
                insert_before_separator(&mut flags, [default.flag.to_string()]);
            }
        }

        if spec.accepts_compilation_database
            && let Some(db) = &config.global.compilation_database
            && !has_flag_key(&flags, "-p")
        {
            insert_before_separator(&mut flags, ["-p".to_string(), db.display().to_string()]);
        }

        log::debug!("[hookwrap] {tool}: flags={flags:?} files={files:?} mode={mode:?}");

        Ok(Self {
            tool,
            flags,
            files,
            mode,
            expected_version,
        })
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Flags forwarded to the tool, in order.
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn expected_version(&self) -> Option<&str> {
        self.expected_version.as_deref()
    }
}

/// Text before `=`, which identifies a flag regardless of its value.
fn flag_key(arg: &str) -> &str {
    arg.split('=').next().unwrap_or(arg)
}

fn has_flag_key(flags: &[String], key: &str) -> bool {
    flags
        .iter()
        .take_while(|f| f.as_str() != ARG_SEPARATOR)
        .any(|f| flag_key(f) == key)
}

/// Group `-c file.cfg` style pairs so they are added or skipped together.
fn flag_groups(args: &[String]) -> Vec<&[String]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..=args.len() {
        if i == args.len() || args[i].starts_with('-') {
            groups.push(&args[start..i]);
            start = i;
        }
    }
    groups.retain(|g| !g.is_empty());
    groups
}

fn insert_before_separator(flags: &mut Vec<String>, new: impl IntoIterator<Item = String>) {
    let at = flags.iter().position(|f| f == ARG_SEPARATOR).unwrap_or(flags.len());
    for (offset, flag) in new.into_iter().enumerate() {
        flags.insert(at + offset, flag);
    }
}
