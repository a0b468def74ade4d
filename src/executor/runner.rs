//! The process-execution seam used by the controller.

use std::time::Duration;

use crate::error::{CommandErrorKind, ControlError, ControlResult};

use super::subprocess::{SubprocessBuilder, SubprocessResult};

/// Exit status and captured output of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Only an exit code of exactly 0 counts as success.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

impl From<SubprocessResult> for CommandOutput {
    fn from(result: SubprocessResult) -> Self {
        Self {
            exit_code: result.exit_code,
            stdout: result.stdout,
            stderr: result.stderr,
        }
    }
}

/// Executes an ordered argument vector `[program, arg...]`.
///
/// A non-zero exit is not an error at this level; it is returned in
/// [`CommandOutput`] for the caller to interpret. Errors are reserved for
/// spawn failures and timeouts.
pub trait CommandRunner: Send + Sync {
    fn run(&self, argv: &[String], timeout: Duration) -> ControlResult<CommandOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String], timeout: Duration) -> ControlResult<CommandOutput> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            ControlError::command(CommandErrorKind::ExecutionFailed {
                message: "Empty argument vector".to_string(),
            })
        })?;

        SubprocessBuilder::new(program)
            .args(args)
            // Keep the control binary's messages untranslated
            .env("LC_ALL", "C")
            .env("SYSTEMD_COLORS", "0")
            .timeout(timeout)
            .run()
            .map(CommandOutput::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_system_runner_success() {
        let output = SystemRunner::new()
            .run(&argv(&["sh", "-c", "echo enabled"]), Duration::from_secs(5))
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "enabled");
    }

    #[test]
    fn test_system_runner_non_zero_is_not_an_error() {
        let output = SystemRunner::new()
            .run(&argv(&["sh", "-c", "echo nope >&2; exit 4"]), Duration::from_secs(5))
            .unwrap();
        assert!(!output.success());
        assert_eq!(output.exit_code, Some(4));
        assert_eq!(output.stderr.trim(), "nope");
    }

    #[test]
    fn test_system_runner_empty_argv() {
        let err = SystemRunner::new().run(&[], Duration::from_secs(1)).unwrap_err();
        assert!(matches!(
            err,
            ControlError::Command {
                kind: CommandErrorKind::ExecutionFailed { .. }
            }
        ));
    }

    #[test]
    fn test_signal_exit_is_not_success() {
        let output = CommandOutput {
            exit_code: None,
            ..Default::default()
        };
        assert!(!output.success());
        assert!(CommandOutput::new(0, "", "").success());
    }
}
