//! hookwrap runs C/C++ formatters and static analyzers behind one
//! commit-hook contract: a run passes with no output, or fails with the
//! tool's diagnostics (or a diff) and a nonzero exit code.
//!
//! ```no_run
//! use hookwrap_lib::{Config, run};
//!
//! let config = Config::load(None)?;
//! let args = vec!["--style=google".to_string(), "src/main.c".to_string()];
//! let result = run("clang-format", &args, &config)?;
//! if !result.is_success() {
//!     print!("{}", String::from_utf8_lossy(&result.output));
//! }
//! # Ok::<(), hookwrap_lib::HookError>(())
//! ```

pub mod command;
pub mod config;
pub mod diff;
pub mod error;
pub mod exit_codes;
pub mod invocation;
pub mod outcome;
pub mod runner;
pub mod tools;
pub mod version;

pub use command::{Command, CommandResult, run};
pub use config::Config;
pub use error::{ConfigurationError, HookError};
pub use invocation::Invocation;
pub use tools::Tool;
