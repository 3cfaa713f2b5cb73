//! Exit codes surfaced by hookwrap itself.
//!
//! Tool-specific sentinel codes (oclint, include-what-you-use) are passed
//! through unchanged, so the codes reserved for hookwrap's own failures sit
//! outside the range those tools use.

/// Success - No diagnostics and no formatting changes
pub const SUCCESS: i32 = 0;

/// Diagnostics found or a formatter would change a file
pub const VIOLATIONS_FOUND: i32 = 1;

/// Bad hook arguments, unsupported tool, version mismatch or invalid config (EX_USAGE)
pub const CONFIG_ERROR: i32 = 64;

/// Internal error such as a timed out tool (EX_SOFTWARE)
pub const INTERNAL_ERROR: i32 = 70;

/// File or pipe I/O failed, including a target vanishing mid-diff (EX_IOERR)
pub const IO_ERROR: i32 = 74;

/// The wrapped tool could not be located or executed
pub const TOOL_NOT_FOUND: i32 = 127;

/// Helper functions for consistent exit behavior
pub mod exit {
    use super::{SUCCESS, VIOLATIONS_FOUND};

    /// Exit with success code (0)
    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    /// Exit with violations found code (1)
    pub fn violations_found() -> ! {
        std::process::exit(VIOLATIONS_FOUND);
    }

    /// Exit with an arbitrary code, used to pass tool sentinels through
    pub fn with_code(code: i32) -> ! {
        std::process::exit(code);
    }
}
