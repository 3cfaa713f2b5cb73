use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use hookwrap_lib::config::Config;
use hookwrap_lib::error::HookError;
use hookwrap_lib::exit_codes::{self, exit};
use hookwrap_lib::tools::{ReportStream, Tool};
use hookwrap_lib::{Command, CommandResult};
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "hookwrap", author, version, about, long_about = None)]
#[command(after_help = "Everything after TOOL is passed to the tool, e.g.\n  \
                        hookwrap clang-format --style=google --no-diff src/main.c")]
struct Cli {
    /// Configuration file path (skips discovery)
    #[arg(long, value_name = "FILE", conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Ignore any configuration file
    #[arg(long)]
    no_config: bool,

    /// Show debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// List supported tools and exit
    #[arg(long)]
    list_tools: bool,

    /// Tool name followed by its hook arguments and files
    #[arg(
        value_name = "TOOL [ARGS]...",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required_unless_present = "list_tools"
    )]
    command: Vec<String>,
}

fn main() {
    let mut argv = env::args_os().map(|arg| arg.to_string_lossy().into_owned());
    let program = argv.next().unwrap_or_default();

    // Installed as `<tool>-hook`, every argument belongs to the tool
    if let Some(tool) = hook_alias(&program) {
        init_logging(false);
        let args: Vec<String> = argv.collect();
        finish(tool.name(), &args, Config::load(None).map_err(HookError::from));
    }

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_tools {
        for tool in Tool::ALL {
            println!("{tool}");
        }
        exit::success();
    }

    let Some((tool_name, args)) = cli.command.split_first() else {
        Cli::command()
            .error(ErrorKind::MissingRequiredArgument, "a TOOL is required")
            .exit();
    };

    let config = if cli.no_config {
        Ok(Config::default())
    } else {
        Config::load(cli.config.as_deref()).map_err(HookError::from)
    };

    finish(tool_name, args, config)
}

fn hook_alias(program: &str) -> Option<Tool> {
    Path::new(program)
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(Tool::from_hook_alias)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn finish(tool_name: &str, args: &[String], config: Result<Config, HookError>) -> ! {
    let outcome = config.and_then(|config| {
        let tool: Tool = tool_name.parse()?;
        let result = Command::new(tool, &config).run(args)?;
        Ok((tool, result))
    });

    match outcome {
        Ok((tool, result)) => {
            if let Err(e) = report(tool.spec().report_stream, &result) {
                eprintln!("Error: {e:#}");
                exit::with_code(exit_codes::IO_ERROR);
            }
            match result.exit_code {
                exit_codes::SUCCESS => exit::success(),
                exit_codes::VIOLATIONS_FOUND => exit::violations_found(),
                code => exit::with_code(code),
            }
        }
        Err(err) => {
            log::debug!("[hookwrap] {err:?}");
            eprintln!("{err}");
            exit::with_code(err.exit_code());
        }
    }
}

/// Write the combined output to the tool's report stream.
fn report(stream: ReportStream, result: &CommandResult) -> anyhow::Result<()> {
    if result.output.is_empty() {
        return Ok(());
    }
    match stream {
        ReportStream::Stdout => {
            let mut out = io::stdout().lock();
            out.write_all(&result.output).context("Failed to write to stdout")?;
            out.flush().context("Failed to flush stdout")?;
        }
        ReportStream::Stderr => {
            let mut err = io::stderr().lock();
            err.write_all(&result.output).context("Failed to write to stderr")?;
            err.flush().context("Failed to flush stderr")?;
        }
    }
    Ok(())
}
