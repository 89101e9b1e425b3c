//! Subprocess execution shared by the probe and transcode components.
//!
//! Runs a command to completion, capturing stdout and stderr. An optional
//! wall-clock timeout kills the child on expiry and surfaces a distinct
//! error so callers can report it apart from an ordinary failure.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use thiserror::Error;

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to start process: {0}")]
    Start(#[source] std::io::Error),

    #[error("failed while waiting for process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("process timed out after {0} seconds")]
    TimedOut(u64),
}

/// Captured result of a finished subprocess.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// The subprocess's stderr as lossy UTF-8, trimmed.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Runs a command to completion and captures its output.
///
/// With `timeout` set, the child is polled and killed once the deadline
/// passes; without it, this blocks until the process exits.
pub fn run_command(
    cmd: &mut Command,
    timeout: Option<Duration>,
) -> Result<CommandOutput, CommandError> {
    debug!("running command: {cmd:?}");

    let Some(timeout) = timeout else {
        let output = cmd.output().map_err(CommandError::Start)?;
        return Ok(CommandOutput {
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    };

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(CommandError::Start)?;

    // Drain the pipes on reader threads so the child cannot block on a full
    // pipe buffer while we poll for exit.
    let stdout_handle = child.stdout.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });
    let stderr_handle = child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait().map_err(CommandError::Wait)? {
            Some(status) => break status,
            None => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CommandError::TimedOut(timeout.as_secs()));
                }
                thread::sleep(Duration::from_millis(100));
            }
        }
    };

    let stdout = stdout_handle
        .map(|handle| handle.join().unwrap_or_default())
        .unwrap_or_default();
    let stderr = stderr_handle
        .map(|handle| handle.join().unwrap_or_default())
        .unwrap_or_default();

    Ok(CommandOutput {
        status,
        stdout,
        stderr,
    })
}
