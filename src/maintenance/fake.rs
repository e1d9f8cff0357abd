//! Scripted [`CommandExecutor`] for catalog and task tests

use super::runner::{CommandExecutor, RunnerError, PROGRESS_CAP, PROGRESS_PER_LINE};
use super::types::{CommandResult, Details, COMPLETED_MESSAGE};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Script {
    Succeed(Vec<String>),
    Fail(String),
    Broken,
    Capture(String),
}

/// Replays canned output per command line and records every command it is asked to run.
#[derive(Debug, Clone, Default)]
pub struct FakeExecutor {
    scripts: HashMap<String, Script>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed(mut self, command: &str, lines: &[&str]) -> Self {
        let lines = lines.iter().map(|s| s.to_string()).collect();
        self.scripts.insert(command.to_string(), Script::Succeed(lines));
        self
    }

    pub fn fail(mut self, command: &str, stderr: &str) -> Self {
        self.scripts
            .insert(command.to_string(), Script::Fail(stderr.to_string()));
        self
    }

    /// The command cannot even be started.
    pub fn broken(mut self, command: &str) -> Self {
        self.scripts.insert(command.to_string(), Script::Broken);
        self
    }

    pub fn capture_output(mut self, command: &str, stdout: &str) -> Self {
        self.scripts
            .insert(command.to_string(), Script::Capture(stdout.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, command: &str) -> Option<Script> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.to_string());
        }
        self.scripts.get(command).cloned()
    }
}

fn spawn_error(command: &str) -> RunnerError {
    RunnerError::Spawn {
        command: command.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
    }
}

impl CommandExecutor for FakeExecutor {
    fn run(
        &self,
        command: &str,
        on_progress: &mut dyn FnMut(f64, &str) -> bool,
    ) -> Result<CommandResult, RunnerError> {
        match self.record(command) {
            Some(Script::Succeed(lines)) => {
                let mut progress = 0.0_f64;
                for line in &lines {
                    progress = (progress + PROGRESS_PER_LINE).min(PROGRESS_CAP);
                    if !on_progress(progress, line) {
                        return Ok(CommandResult::cancelled());
                    }
                }
                Ok(CommandResult::success(
                    COMPLETED_MESSAGE,
                    Details::Output { output: lines },
                ))
            }
            Some(Script::Fail(stderr)) => Ok(CommandResult::failure(format!("Error: {}", stderr))),
            Some(Script::Capture(_)) | Some(Script::Broken) | None => Err(spawn_error(command)),
        }
    }

    fn capture(&self, command: &str) -> Result<String, RunnerError> {
        match self.record(command) {
            Some(Script::Capture(stdout)) => Ok(stdout),
            _ => Err(spawn_error(command)),
        }
    }
}
