//! Safe subprocess execution.
//!
//! Provides utilities for running external commands safely with:
//! - No shell interpretation (direct exec)
//! - Configurable timeouts
//! - Captured stdout/stderr

use std::collections::HashMap;
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{CommandErrorKind, ControlError};

/// Result of a subprocess execution.
#[derive(Debug, Clone)]
pub struct SubprocessResult {
    /// Whether the command exited successfully (exit code 0).
    pub success: bool,
    /// The exit code, if available.
    pub exit_code: Option<i32>,
    /// Captured stdout as a string.
    pub stdout: String,
    /// Captured stderr as a string.
    pub stderr: String,
}

/// Builder for subprocess execution.
pub struct SubprocessBuilder {
    program: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    timeout: Duration,
}

impl SubprocessBuilder {
    /// Create a new subprocess builder.
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            env: HashMap::new(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Add arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args.extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Set the timeout for the command.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Execute the command and wait for completion with timeout enforcement.
    ///
    /// stdout and stderr are drained on reader threads while waiting, so a
    /// chatty child never blocks on a full pipe. If the process exceeds the
    /// configured timeout, it is killed and reaped, and a timeout error is
    /// returned.
    pub fn run(self) -> Result<SubprocessResult, ControlError> {
        debug!(
            program = %self.program,
            args = ?self.args,
            timeout_ms = self.timeout.as_millis() as u64,
            "Executing subprocess"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().map_err(|e| {
            ControlError::command(CommandErrorKind::ExecutionFailed {
                message: format!("Failed to spawn {}: {}", self.program, e),
            })
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let start = Instant::now();
        let poll_interval = Duration::from_millis(20);

        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    let result = SubprocessResult {
                        success: status.success(),
                        exit_code: status.code(),
                        stdout: collect(stdout),
                        stderr: collect(stderr),
                    };
                    debug!(
                        success = result.success,
                        exit_code = ?result.exit_code,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Subprocess completed"
                    );
                    return Ok(result);
                }
                Ok(None) => {
                    if start.elapsed() > self.timeout {
                        warn!(
                            program = %self.program,
                            timeout_ms = self.timeout.as_millis() as u64,
                            "Process timed out, killing"
                        );
                        if let Err(e) = child.kill() {
                            warn!(error = %e, "Failed to kill timed-out process");
                        }
                        // Reap the zombie. Reader threads finish on their own
                        // once every holder of the pipes is gone.
                        let _ = child.wait();
                        return Err(ControlError::command(CommandErrorKind::Timeout {
                            command: self.command_line(),
                            timeout_ms: self.timeout.as_millis(),
                        }));
                    }
                    std::thread::sleep(poll_interval);
                }
                Err(e) => {
                    return Err(ControlError::command(CommandErrorKind::ExecutionFailed {
                        message: format!("Failed to check process status: {}", e),
                    }));
                }
            }
        }
    }
}

/// Read a child pipe to the end on a separate thread.
fn drain<P>(pipe: Option<P>) -> Option<JoinHandle<Vec<u8>>>
where
    P: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            // A read error leaves whatever arrived before it
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(program: &str, args: &[&str], timeout: Duration) -> Result<SubprocessResult, ControlError> {
        SubprocessBuilder::new(program).args(args).timeout(timeout).run()
    }

    #[test]
    fn test_run_echo() {
        let result = run("echo", &["hello", "world"], Duration::from_secs(5)).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout.trim(), "hello world");
    }

    #[test]
    fn test_run_false_command() {
        let result = run("false", &[], Duration::from_secs(5)).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(1));
    }

    #[test]
    fn test_subprocess_builder_with_env() {
        let result = SubprocessBuilder::new("sh")
            .args(["-c", "echo $UNIT_TEST_VAR"])
            .env("UNIT_TEST_VAR", "hello_env")
            .timeout(Duration::from_secs(5))
            .run()
            .unwrap();

        assert!(result.success);
        assert_eq!(result.stdout.trim(), "hello_env");
    }

    #[test]
    fn test_nonexistent_command() {
        let err = run("nonexistent_command_12345", &[], Duration::from_secs(5)).unwrap_err();
        assert!(matches!(
            err,
            ControlError::Command {
                kind: CommandErrorKind::ExecutionFailed { .. }
            }
        ));
    }

    #[test]
    fn test_stderr_capture() {
        let result = run("sh", &["-c", "echo error >&2; exit 3"], Duration::from_secs(5)).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.stderr.trim(), "error");
    }

    #[test]
    fn test_output_larger_than_pipe_buffer() {
        let result = run(
            "sh",
            &["-c", "head -c 200000 /dev/zero | tr '\\0' x >&2; echo done; exit 1"],
            Duration::from_secs(10),
        )
        .unwrap();

        assert_eq!(result.exit_code, Some(1));
        assert_eq!(result.stderr.len(), 200_000);
        assert_eq!(result.stdout.trim(), "done");
    }

    #[test]
    fn test_timeout_kills_process() {
        let started = Instant::now();
        let err = run("sleep", &["5"], Duration::from_millis(200)).unwrap_err();
        assert!(err.is_timeout());
        assert!(err.to_string().contains("sleep 5"));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
