//! The closed set of wrapped tools and the per-tool behaviour table.
//!
//! Every difference between the wrapped tools lives in one [`ToolSpec`]
//! record per [`Tool`] variant:
//!
//! - argv order (`clang-tidy file.c -checks=...` vs `cppcheck -q file.c`)
//! - which of the tool's own switches select fix mode
//! - flags whose next argument is a value rather than a target file
//! - flags added when missing, to force the tool into a checking mode
//! - how the raw exit code and output are reconciled ([`OutcomePolicy`])
//!
//! # Tools
//!
//! | Tool | Kind | Policy |
//! |------|------|--------|
//! | `clang-format` | formatter | diff decides |
//! | `uncrustify` | formatter (`-f <file>` in check mode) | diff decides |
//! | `clang-tidy` | analyzer | exit code, recomputed under `--fix-errors` |
//! | `cppcheck` | analyzer | exit code |
//! | `cpplint` | analyzer | exit code |
//! | `include-what-you-use` | analyzer | recomputed from output |
//! | `oclint` | analyzer | sentinel exit codes |

pub mod registry;

use crate::error::ConfigurationError;
use crate::outcome::OutcomePolicy;
use std::fmt;
use std::str::FromStr;

/// A wrapped tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tool {
    ClangFormat,
    ClangTidy,
    Cppcheck,
    Cpplint,
    IncludeWhatYouUse,
    Oclint,
    Uncrustify,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::ClangFormat,
        Tool::ClangTidy,
        Tool::Cppcheck,
        Tool::Cpplint,
        Tool::IncludeWhatYouUse,
        Tool::Oclint,
        Tool::Uncrustify,
    ];

    /// Name of the tool, which is also its default executable.
    pub fn name(self) -> &'static str {
        match self {
            Self::ClangFormat => "clang-format",
            Self::ClangTidy => "clang-tidy",
            Self::Cppcheck => "cppcheck",
            Self::Cpplint => "cpplint",
            Self::IncludeWhatYouUse => "include-what-you-use",
            Self::Oclint => "oclint",
            Self::Uncrustify => "uncrustify",
        }
    }

    pub fn spec(self) -> &'static ToolSpec {
        registry::spec_for(self)
    }

    pub fn is_formatter(self) -> bool {
        matches!(self.spec().kind, ToolKind::Formatter { .. })
    }

    /// Resolve a hook alias such as `clang-format-hook` to its tool.
    pub fn from_hook_alias(program: &str) -> Option<Self> {
        program.strip_suffix("-hook").and_then(|name| name.parse().ok())
    }

    fn supported_list() -> String {
        Self::ALL.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tool = match s {
            "iwyu" => Some(Self::IncludeWhatYouUse),
            _ => Self::ALL.into_iter().find(|t| t.name() == s),
        };
        tool.ok_or_else(|| ConfigurationError::UnsupportedTool {
            name: s.to_string(),
            supported: Self::supported_list(),
        })
    }
}

/// Whether a tool only reports, or may also rewrite its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Reports problems, never edits files
    Analyzer,
    /// Prints or writes the formatted file
    Formatter {
        /// Flag placed before the file in check mode so the tool prints the
        /// formatted content to stdout (uncrustify needs `-f`)
        file_flag: Option<&'static str>,
    },
}

/// Position of target files relative to flags in the tool's argv.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgOrder {
    FlagsThenFiles,
    FilesThenFlags,
}

/// Effect of one of the tool's own switches. These are always forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagEffect {
    /// The tool rewrites its targets in place
    InPlace,
    /// clang-tidy applies fixes even for compiler errors and then exits 0
    FixErrors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagRule {
    pub literal: &'static str,
    pub effect: FlagEffect,
}

/// A flag added to the tool's argv unless already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultFlag {
    pub flag: &'static str,
    /// Any existing argument whose text before `=` equals this key counts
    /// as present. Repeatable flags use the whole flag as their key.
    pub key: &'static str,
}

/// Where the CLI writes a tool's combined output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStream {
    Stdout,
    Stderr,
}

/// Per-tool behaviour record.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub tool: Tool,
    pub kind: ToolKind,
    pub arg_order: ArgOrder,
    pub flags: &'static [FlagRule],
    pub value_flags: &'static [&'static str],
    pub default_flags: &'static [DefaultFlag],
    /// Text preceding the version number in `<tool> --version`
    pub version_prefix: &'static str,
    /// Receives `-p <dir>` when a compilation database is configured
    pub accepts_compilation_database: bool,
    pub policy: OutcomePolicy,
    pub report_stream: ReportStream,
}

impl ToolSpec {
    pub fn effect_of(&self, arg: &str) -> Option<FlagEffect> {
        self.flags.iter().find(|rule| rule.literal == arg).map(|rule| rule.effect)
    }

    pub fn takes_value(&self, arg: &str) -> bool {
        self.value_flags.contains(&arg)
    }
}
