//! The command façade: one tool, one set of hook arguments, one result.

use crate::config::Config;
use crate::diff::{FileDiff, FileSnapshot};
use crate::error::HookError;
use crate::exit_codes;
use crate::invocation::Invocation;
use crate::outcome::{Outcome, formatter_failed};
use crate::runner::ProcessRunner;
use crate::tools::{ArgOrder, Tool, ToolKind, ToolSpec};
use crate::version;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

/// Final outcome of a [`Command`].
///
/// `exit_code` is 0 only when `output` is empty and no formatter would
/// change a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub output: Vec<u8>,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn is_success(&self) -> bool {
        self.exit_code == exit_codes::SUCCESS
    }

    /// Append one file's outcome. The first nonzero code is kept.
    fn absorb(&mut self, outcome: Outcome) {
        self.output.extend_from_slice(&outcome.output);
        if self.exit_code == exit_codes::SUCCESS {
            self.exit_code = outcome.exit_code;
        }
    }
}

/// Runs one wrapped tool with read-only configuration.
#[derive(Debug, Clone, Copy)]
pub struct Command<'a> {
    tool: Tool,
    config: &'a Config,
}

impl<'a> Command<'a> {
    pub fn new(tool: Tool, config: &'a Config) -> Self {
        Self { tool, config }
    }

    /// Classify `args`, run the tool against every target file and reconcile
    /// the results.
    pub fn run(&self, args: &[String]) -> Result<CommandResult, HookError> {
        let invocation = Invocation::new(self.tool, args, self.config)?;
        self.execute(&invocation)
    }

    /// Run an already-built invocation.
    pub fn execute(&self, invocation: &Invocation) -> Result<CommandResult, HookError> {
        let tool = invocation.tool();
        let runner = ProcessRunner::new(tool, self.config.binary_for(tool));

        if let Some(expected) = invocation.expected_version() {
            version::ensure(&runner, tool, expected)?;
        }

        let mut result = CommandResult::default();
        if tool.is_formatter() {
            for file in invocation.files() {
                result.absorb(format_file(&runner, invocation, file)?);
            }
        } else {
            // clang-tidy's fix switches rewrite the targets, so those runs are never killed
            let mode = invocation.mode();
            let timeout = (!mode.in_place && !mode.fix_errors)
                .then(|| Duration::from_millis(self.config.global.timeout));
            let runner = runner.with_timeout(timeout);
            for file in invocation.files() {
                result.absorb(analyze_file(&runner, invocation, file)?);
            }
        }

        log::debug!(
            "[hookwrap] {tool}: exit code {} ({} bytes of output)",
            result.exit_code,
            result.output.len()
        );
        Ok(result)
    }
}

/// Resolve `tool_name` and run it with `args`.
pub fn run(tool_name: &str, args: &[String], config: &Config) -> Result<CommandResult, HookError> {
    let tool: Tool = tool_name.parse()?;
    Command::new(tool, config).run(args)
}

fn format_file(runner: &ProcessRunner, invocation: &Invocation, file: &Path) -> Result<Outcome, HookError> {
    let tool = invocation.tool();
    let spec = tool.spec();
    let mode = invocation.mode();

    let snapshot = FileSnapshot::take(file).map_err(|source| HookError::Io {
        tool: tool.name().to_string(),
        context: format!("Failed to read {}", file.display()),
        source,
    })?;

    let mut file_args: Vec<OsString> = Vec::with_capacity(2);
    if !mode.in_place
        && let ToolKind::Formatter {
            file_flag: Some(flag),
        } = spec.kind
    {
        file_args.push(flag.into());
    }
    file_args.push(file.into());

    let mut captured = runner.run(build_argv(spec, invocation.flags(), file_args))?;

    let after = snapshot.reread().map_err(|source| HookError::DiffComputation {
        tool: tool.name().to_string(),
        path: file.to_path_buf(),
        source,
    })?;

    if formatter_failed(&captured) || mode.in_place {
        if mode.in_place && after != snapshot.content() {
            log::info!("[hookwrap] {tool}: reformatted {}", file.display());
        }
        return Ok(spec.policy.resolve(mode, captured, None));
    }

    // In check mode stdout is the formatted file, not report text
    let formatted = std::mem::take(&mut captured.stdout);
    let diff = FileDiff::compute(snapshot.path(), snapshot.content(), &formatted);
    Ok(spec.policy.resolve(mode, captured, Some(&diff)))
}

fn analyze_file(runner: &ProcessRunner, invocation: &Invocation, file: &Path) -> Result<Outcome, HookError> {
    let spec = invocation.tool().spec();
    let captured = runner.run(build_argv(spec, invocation.flags(), vec![file.into()]))?;
    Ok(spec.policy.resolve(invocation.mode(), captured, None))
}

fn build_argv(spec: &ToolSpec, flags: &[String], file_args: Vec<OsString>) -> Vec<OsString> {
    let flags = flags.iter().map(OsString::from);
    match spec.arg_order {
        ArgOrder::FlagsThenFiles => flags.chain(file_args).collect(),
        ArgOrder::FilesThenFlags => file_args.into_iter().chain(flags).collect(),
    }
}
