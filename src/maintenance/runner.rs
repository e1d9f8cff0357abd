//! Streaming shell command execution
//!
//! The child runs in its own process group so a cancellation can signal the
//! whole tree (`sh` + `pkexec` + `apt-get`) at once.

use super::types::{CommandResult, Details, COMPLETED_MESSAGE};
use std::io::{BufRead, BufReader, Read};
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Progress added for every captured stdout line.
pub const PROGRESS_PER_LINE: f64 = 0.01;
/// Ceiling while a command is still running; completion is signalled by the result.
pub const PROGRESS_CAP: f64 = 0.99;
/// How long a cancelled child gets to exit after SIGTERM before SIGKILL.
const TERMINATE_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("output of `{0}` was not captured")]
    MissingPipe(String),
    #[error("failed to read output of `{command}`: {source}")]
    Read {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Executes shell command lines on behalf of the operation catalog.
pub trait CommandExecutor {
    /// Run `command`, streaming each stdout line to `on_progress`.
    ///
    /// `on_progress` returning `false` cancels the command.
    fn run(
        &self,
        command: &str,
        on_progress: &mut dyn FnMut(f64, &str) -> bool,
    ) -> Result<CommandResult, RunnerError>;

    /// Run a short command to completion and return its trimmed stdout.
    fn capture(&self, command: &str) -> Result<String, RunnerError>;
}

/// Runs commands through `sh -c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    fn spawn(command: &str) -> Result<Child, RunnerError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        unsafe {
            cmd.pre_exec(|| {
                // own process group, and die with the parent
                libc::setpgid(0, 0);
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }
        cmd.spawn().map_err(|source| RunnerError::Spawn {
            command: command.to_string(),
            source,
        })
    }
}

impl CommandExecutor for ShellRunner {
    fn run(
        &self,
        command: &str,
        on_progress: &mut dyn FnMut(f64, &str) -> bool,
    ) -> Result<CommandResult, RunnerError> {
        log::debug!("spawning `{}`", command);
        let mut child = Self::spawn(command)?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            terminate(child);
            return Err(RunnerError::MissingPipe(command.to_string()));
        };

        // Drained on its own thread so a chatty stderr cannot fill the pipe
        // and stall the child while we wait on stdout.
        let stderr_handle = thread::spawn(move || read_all_lossy(stderr));

        let mut reader = BufReader::new(stdout);
        let mut buffer = Vec::new();
        let mut lines = Vec::new();
        let mut progress = 0.0_f64;

        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer) {
                Ok(0) => break,
                Ok(_) => {}
                Err(source) => {
                    terminate(child);
                    return Err(RunnerError::Read {
                        command: command.to_string(),
                        source,
                    });
                }
            }

            let text = String::from_utf8_lossy(&buffer);
            let line = text.trim_end();
            if line.is_empty() {
                continue;
            }

            lines.push(line.to_string());
            progress = (progress + PROGRESS_PER_LINE).min(PROGRESS_CAP);

            if !on_progress(progress, line) {
                log::warn!("`{}` cancelled after {} lines", command, lines.len());
                terminate(child);
                return Ok(CommandResult::cancelled());
            }
        }

        let status = child.wait().map_err(|source| RunnerError::Wait {
            command: command.to_string(),
            source,
        })?;
        let stderr_text = stderr_handle.join().unwrap_or_default();

        if status.success() {
            Ok(CommandResult::success(
                COMPLETED_MESSAGE,
                Details::Output { output: lines },
            ))
        } else {
            log::info!("`{}` exited with {}", command, status);
            Ok(CommandResult::failure(format!("Error: {}", stderr_text)))
        }
    }

    fn capture(&self, command: &str) -> Result<String, RunnerError> {
        log::debug!("capturing `{}`", command);
        duct::cmd!("sh", "-c", command)
            .stderr_null()
            .unchecked()
            .read()
            .map(|out| out.trim().to_string())
            .map_err(|source| RunnerError::Spawn {
                command: command.to_string(),
                source,
            })
    }
}

fn read_all_lossy(mut stream: impl Read) -> String {
    let mut raw = Vec::new();
    let _ = stream.read_to_end(&mut raw);
    String::from_utf8_lossy(&raw).into_owned()
}

fn group_alive(pgid: i32) -> bool {
    unsafe { libc::kill(-pgid, 0) == 0 }
}

/// Ask the child's process group to stop and return immediately.
///
/// A detached thread reaps the child and escalates to SIGKILL once
/// [`TERMINATE_GRACE`] has passed with the group still alive.
fn terminate(mut child: Child) {
    let pgid = child.id() as i32;
    unsafe {
        libc::kill(-pgid, libc::SIGTERM);
    }

    thread::spawn(move || {
        let deadline = Instant::now() + TERMINATE_GRACE;
        loop {
            // reap `sh` as soon as it exits so it does not keep the group alive as a zombie
            let _ = child.try_wait();
            if !group_alive(pgid) {
                break;
            }
            if Instant::now() >= deadline {
                log::warn!("process group {} ignored SIGTERM, sending SIGKILL", pgid);
                unsafe {
                    libc::kill(-pgid, libc::SIGKILL);
                }
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }
        let _ = child.wait();
    });
}
