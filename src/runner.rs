//! Subprocess execution for wrapped tools.
//!
//! Both streams are captured as raw bytes and never decoded: diagnostics
//! embed paths, caret markers and version-dependent text that must reach the
//! caller byte-for-byte.

use crate::error::HookError;
use crate::tools::Tool;
use std::ffi::OsStr;
use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Streams and status of one finished tool process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Exit code, or -1 if the process was terminated by a signal.
    pub exit_code: i32,
}

impl CapturedOutput {
    /// stdout followed by stderr.
    pub fn combined(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.stdout.len() + self.stderr.len());
        out.extend_from_slice(&self.stdout);
        out.extend_from_slice(&self.stderr);
        out
    }
}

/// Runs one tool binary.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    tool: Tool,
    binary: String,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(tool: Tool, binary: impl Into<String>) -> Self {
        Self {
            tool,
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Kill the process if it runs longer than `timeout`.
    ///
    /// Callers must not set this for tools that rewrite files: killing one
    /// mid-write leaves nothing meaningful to diff against.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    /// Spawn the tool with exactly `args` and wait for it to finish.
    pub fn run<I, S>(&self, args: I) -> Result<CapturedOutput, HookError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        log::debug!("[hookwrap] Running {cmd:?}");

        let mut child = cmd.spawn().map_err(|source| match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => HookError::ToolNotFound {
                tool: self.binary.clone(),
                source,
            },
            _ => self.io_error(format!("Failed to spawn '{}'", self.binary), source),
        })?;

        let mut stdout_handle = child
            .stdout
            .take()
            .map(|stdout| thread::spawn(move || read_pipe(stdout)));
        let mut stderr_handle = child
            .stderr
            .take()
            .map(|stderr| thread::spawn(move || read_pipe(stderr)));

        let status = match self.timeout {
            None => child
                .wait()
                .map_err(|e| self.io_error(format!("Failed to wait for '{}'", self.binary), e))?,
            Some(timeout) => {
                let start = Instant::now();
                loop {
                    if let Some(status) = child
                        .try_wait()
                        .map_err(|e| self.io_error(format!("Failed to poll '{}'", self.binary), e))?
                    {
                        break status;
                    }
                    if start.elapsed() >= timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        let _ = join_reader(stdout_handle.take());
                        let _ = join_reader(stderr_handle.take());
                        return Err(HookError::Timeout {
                            tool: self.tool.name().to_string(),
                            timeout_ms: timeout.as_millis() as u64,
                        });
                    }
                    thread::sleep(Duration::from_millis(10));
                }
            }
        };

        let stdout = join_reader(stdout_handle.take()).map_err(|e| self.io_error("Failed to read stdout".into(), e))?;
        let stderr = join_reader(stderr_handle.take()).map_err(|e| self.io_error("Failed to read stderr".into(), e))?;
        let exit_code = status.code().unwrap_or(-1);

        log::debug!(
            "[hookwrap] {} exited with {exit_code} ({} bytes stdout, {} bytes stderr)",
            self.binary,
            stdout.len(),
            stderr.len()
        );

        Ok(CapturedOutput {
            stdout,
            stderr,
            exit_code,
        })
    }

    fn io_error(&self, context: String, source: io::Error) -> HookError {
        HookError::Io {
            tool: self.tool.name().to_string(),
            context,
            source,
        }
    }
}

fn read_pipe<R: Read>(mut pipe: R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(buf)
}

fn join_reader(handle: Option<thread::JoinHandle<io::Result<Vec<u8>>>>) -> io::Result<Vec<u8>> {
    match handle {
        Some(handle) => match handle.join() {
            Ok(res) => res,
            Err(_) => Err(io::Error::other("Output reader thread panicked")),
        },
        None => Ok(Vec::new()),
    }
}
