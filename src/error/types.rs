//! Error types for the service controller.

use thiserror::Error;

use crate::executor::tail_output;

/// Lines of stderr shown in failure messages. The error keeps all of it.
const STDERR_DISPLAY_LINES: usize = 20;

/// Main error type for controller operations.
#[derive(Error, Debug)]
pub enum ControlError {
    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors, raised before any command is composed.
    #[error("Validation error: {kind}")]
    Validation { kind: ValidationErrorKind },

    /// Command execution errors.
    #[error("Command error: {kind}")]
    Command { kind: CommandErrorKind },

    /// Enabling a service failed. Wraps the underlying command error.
    #[error("Could not enable {service}: {source}")]
    Enable {
        service: String,
        #[source]
        source: Box<ControlError>,
    },

    /// Serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Validation error kinds.
#[derive(Error, Debug)]
pub enum ValidationErrorKind {
    #[error("Service name cannot be empty")]
    EmptyServiceName,

    #[error("Service not recognized: {service}")]
    UnknownService { service: String },

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },
}

/// Command error kinds.
#[derive(Error, Debug)]
pub enum CommandErrorKind {
    /// The control binary could not be spawned or waited on.
    #[error("Command execution failed: {message}")]
    ExecutionFailed { message: String },

    /// The control binary ran and reported failure. `stderr` holds the
    /// full captured text, trimmed.
    #[error(
        "`{command}` exited with {}: {}",
        describe_exit(.exit_code),
        tail_output(.stderr, STDERR_DISPLAY_LINES)
    )]
    NonZeroExit {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("`{command}` timed out after {timeout_ms} ms")]
    Timeout { command: String, timeout_ms: u128 },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl ControlError {
    pub(crate) fn validation(kind: ValidationErrorKind) -> Self {
        ControlError::Validation { kind }
    }

    pub(crate) fn command(kind: CommandErrorKind) -> Self {
        ControlError::Command { kind }
    }

    /// True for a non-zero exit of the control binary.
    pub fn is_control_failure(&self) -> bool {
        matches!(
            self,
            ControlError::Command {
                kind: CommandErrorKind::NonZeroExit { .. }
            }
        )
    }

    pub fn is_enable_failure(&self) -> bool {
        matches!(self, ControlError::Enable { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ControlError::Command {
                kind: CommandErrorKind::Timeout { .. }
            }
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ControlError::Validation { .. })
    }

    /// Captured stderr of the failing command, if the error carries one.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            ControlError::Command {
                kind: CommandErrorKind::NonZeroExit { stderr, .. },
            } => Some(stderr),
            ControlError::Enable { source, .. } => source.stderr(),
            _ => None,
        }
    }
}

/// Result type alias for controller operations.
pub type ControlResult<T> = Result<T, ControlError>;
