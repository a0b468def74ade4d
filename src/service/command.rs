//! Composed control-binary invocations.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::name::ServiceName;
use super::state::ObservedState;

/// Sub-command passed to the control binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verb {
    Start,
    Stop,
    Restart,
    Enable,
    Disable,
    IsEnabled,
    IsActive,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Start => "start",
            Verb::Stop => "stop",
            Verb::Restart => "restart",
            Verb::Enable => "enable",
            Verb::Disable => "disable",
            Verb::IsEnabled => "is-enabled",
            Verb::IsActive => "is-active",
        }
    }

    /// State a successful invocation of this verb leaves the service in.
    pub fn implied_state(self) -> ObservedState {
        match self {
            Verb::Start | Verb::Restart => ObservedState::Running,
            Verb::Stop => ObservedState::Stopped,
            Verb::Enable => ObservedState::Enabled,
            Verb::Disable => ObservedState::Disabled,
            Verb::IsEnabled | Verb::IsActive => ObservedState::Unknown,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command descriptor: `[program, verb, service]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCommand {
    pub program: PathBuf,
    pub verb: Verb,
    pub service: ServiceName,
}

impl ServiceCommand {
    pub fn new(program: impl Into<PathBuf>, verb: Verb, service: ServiceName) -> Self {
        Self {
            program: program.into(),
            verb,
            service,
        }
    }

    /// Argument vector in the positional order the control binary parses.
    pub fn argv(&self) -> Vec<String> {
        vec![
            self.program.to_string_lossy().into_owned(),
            self.verb.as_str().to_string(),
            self.service.as_str().to_string(),
        ]
    }
}

impl fmt::Display for ServiceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.program.display(),
            self.verb,
            self.service
        )
    }
}
