//! In-memory runner for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{CommandErrorKind, ControlError, ControlResult};

use super::runner::{CommandOutput, CommandRunner};

/// Replays queued results and records every argument vector. Once the
/// queue is drained every call exits 0.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    responses: Mutex<VecDeque<ControlResult<CommandOutput>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub(crate) fn replying(responses: Vec<ControlResult<CommandOutput>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn exit(code: i32, stdout: &str, stderr: &str) -> Self {
        Self::replying(vec![Ok(CommandOutput::new(code, stdout, stderr))])
    }

    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, argv: &[String], _timeout: Duration) -> ControlResult<CommandOutput> {
        self.calls.lock().unwrap().push(argv.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CommandOutput::new(0, "", "")))
    }
}

pub(crate) fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn spawn_failure() -> ControlError {
    ControlError::command(CommandErrorKind::ExecutionFailed {
        message: "Failed to spawn /bin/systemctl: No such file or directory".to_string(),
    })
}

pub(crate) fn timeout() -> ControlError {
    ControlError::command(CommandErrorKind::Timeout {
        command: "/bin/systemctl".to_string(),
        timeout_ms: 1000,
    })
}
