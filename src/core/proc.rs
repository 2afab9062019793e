//! Bounded external process execution.
//!
//! Every external program panefm runs (the `:` shell prompt, `bat` for
//! previews) goes through [run], which enforces a wall-clock timeout. A
//! process that outlives its timeout is killed and reported as
//! [ProcError::Timeout]. [run_shell] folds every failure into a
//! [CommandOutcome] so the caller always gets a value it can show.

use crossbeam_channel::{Receiver, bounded};
use thiserror::Error;

use std::ffi::{OsStr, OsString};
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Bytes kept per stream; the rest is drained and dropped.
const MAX_CAPTURE: usize = 256 * 1024;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Time given to the pipe readers after the process exits.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum ProcError {
    #[error("`{program}` was not found in PATH")]
    NotFound { program: String },
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("failed waiting for process: {0}")]
    Wait(#[from] io::Error),
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone)]
pub struct ProcOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// What the user sees after a shell command: exit code, output and an error
/// description. `exit_code` is `None` when the process never finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: String,
    pub exit_code: Option<i32>,
    pub output: String,
    pub error: Option<String>,
}

impl CommandOutcome {
    #[inline]
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && self.error.is_none()
    }

    fn failed(command: &str, err: &ProcError) -> Self {
        Self {
            command: command.to_string(),
            exit_code: None,
            output: String::new(),
            error: Some(err.to_string()),
        }
    }

    /// One-line summary for the status line.
    pub fn summary(&self) -> String {
        let first_line = |s: &str| s.lines().find(|l| !l.trim().is_empty()).unwrap_or("").to_string();
        match (&self.error, self.exit_code) {
            (Some(err), _) => format!("`{}` failed: {}", self.command, first_line(err)),
            (None, Some(0)) => {
                let out = first_line(&self.output);
                if out.is_empty() {
                    format!("`{}` done", self.command)
                } else {
                    out
                }
            }
            (None, Some(code)) => format!("`{}` exited with {}", self.command, code),
            (None, None) => format!("`{}` was terminated", self.command),
        }
    }
}

/// Runs `program` in `workdir` with the given args, killing it once
/// `timeout` elapses.
pub fn run(
    timeout: Duration,
    workdir: &Path,
    program: &OsStr,
    args: &[OsString],
) -> Result<ProcOutput, ProcError> {
    let name = program.to_string_lossy().into_owned();
    let mut child = Command::new(program)
        .args(args)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ProcError::NotFound {
                    program: name.clone(),
                }
            } else {
                ProcError::Spawn {
                    program: name.clone(),
                    source,
                }
            }
        })?;

    let stdout_rx = child.stdout.take().map(spawn_reader);
    let stderr_rx = child.stderr.take().map(spawn_reader);

    let status = wait_with_deadline(&mut child, Instant::now() + timeout)?;
    let Some(status) = status else {
        log::warn!("`{name}` killed after {}ms", timeout.as_millis());
        return Err(ProcError::Timeout(timeout));
    };

    Ok(ProcOutput {
        status,
        stdout: collect(stdout_rx),
        stderr: collect(stderr_rx),
    })
}

/// Runs `cmd` through the platform shell. Never fails: spawn errors and
/// timeouts become an outcome with `error` set.
pub fn run_shell(timeout: Duration, workdir: &Path, cmd: &str) -> CommandOutcome {
    #[cfg(windows)]
    let (shell, flag) = ("cmd", "/C");
    #[cfg(not(windows))]
    let (shell, flag) = ("sh", "-c");

    let args = [OsString::from(flag), OsString::from(cmd)];
    match run(timeout, workdir, OsStr::new(shell), &args) {
        Ok(out) => {
            let code = out.status.code();
            let error = if out.status.success() || out.stderr.trim().is_empty() {
                None
            } else {
                Some(out.stderr.trim_end().to_string())
            };
            CommandOutcome {
                command: cmd.to_string(),
                exit_code: code,
                output: out.stdout,
                error,
            }
        }
        Err(e) => {
            log::debug!("shell command `{cmd}` failed: {e}");
            CommandOutcome::failed(cmd, &e)
        }
    }
}

/// Previews a file with `bat`, returning up to `max_lines` lines of its
/// (possibly colored) output.
pub fn preview_bat(
    path: &Path,
    max_lines: usize,
    bat_args: &[OsString],
    timeout: Duration,
) -> Result<Vec<String>, ProcError> {
    let mut args = bat_args.to_vec();
    args.push(OsString::from("--line-range"));
    args.push(OsString::from(format!(":{}", max_lines.max(1))));
    args.push(path.as_os_str().to_os_string());

    let workdir = path.parent().unwrap_or(Path::new("."));
    let out = run(timeout, workdir, OsStr::new("bat"), &args)?;
    if !out.status.success() {
        return Err(ProcError::Wait(io::Error::other(format!(
            "bat exited with {}",
            out.status
        ))));
    }
    Ok(out
        .stdout
        .lines()
        .take(max_lines)
        .map(str::to_owned)
        .collect())
}

/// Polls the child until it exits or the deadline passes. On timeout the
/// child is killed and reaped, and `None` is returned.
fn wait_with_deadline(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut stream: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = bounded(1);
    thread::spawn(move || {
        let mut kept = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    let room = MAX_CAPTURE.saturating_sub(kept.len());
                    kept.extend_from_slice(&chunk[..n.min(room)]);
                }
            }
        }
        let _ = tx.send(kept);
    });
    rx
}

/// A grandchild holding the pipe open must not stall the caller, so the
/// reader gets a short grace period and whatever it has is discarded after.
fn collect(rx: Option<Receiver<Vec<u8>>>) -> String {
    rx.and_then(|rx| rx.recv_timeout(DRAIN_GRACE).ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
