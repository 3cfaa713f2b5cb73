//! Tool version pinning.
//!
//! A pinned version is a prefix of whole components: `8` accepts `8.0.1`,
//! `14.0` accepts `14.0.6` but not `14.1.0`, and `1` does not accept `12.0`.

use crate::error::{ConfigurationError, HookError};
use crate::runner::ProcessRunner;
use crate::tools::Tool;
use regex::Regex;

const VERSION_NUMBER: &str = r"((?:\d+\.)+[\d+_+\-a-z]+)";

/// Extract the version number from `<tool> --version` output.
pub fn parse_version(tool: Tool, banner: &str) -> Option<String> {
    let pattern = format!("{}{VERSION_NUMBER}", tool.spec().version_prefix);
    let re = Regex::new(&pattern).ok()?;
    re.captures(banner)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Compare an already-parsed version against the pin, component by
/// component: `1` accepts `1.2` but not `12.0`.
pub fn matches(expected: &str, actual: &str) -> bool {
    actual
        .strip_prefix(expected)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['.', '-', '_', '+']))
}

/// Run `<binary> --version` and fail unless it satisfies `expected`.
pub fn ensure(runner: &ProcessRunner, tool: Tool, expected: &str) -> Result<(), HookError> {
    let captured = runner.run(["--version"])?;
    let banner = String::from_utf8_lossy(&captured.combined()).into_owned();

    let actual = parse_version(tool, &banner).ok_or_else(|| ConfigurationError::VersionUnknown {
        tool: tool.name().to_string(),
        banner: banner.trim().to_string(),
    })?;

    log::debug!("[hookwrap] {tool}: found version {actual}, expected {expected}");

    if matches(expected, &actual) {
        Ok(())
    } else {
        Err(ConfigurationError::VersionMismatch {
            tool: tool.name().to_string(),
            expected: expected.to_string(),
            actual,
        }
        .into())
    }
}
