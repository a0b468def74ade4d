//! Desired and observed service states.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ValidationErrorKind};

use super::command::{ServiceCommand, Verb};
use super::name::ServiceName;

/// Target state requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    #[default]
    #[serde(alias = "start", alias = "started")]
    Running,
    #[serde(alias = "stop")]
    Stopped,
    #[serde(alias = "restart")]
    Restarted,
    #[serde(alias = "enable")]
    Enabled,
    #[serde(alias = "disable")]
    Disabled,
}

impl DesiredState {
    /// Verb that drives a service into this state.
    pub fn verb(self) -> Verb {
        match self {
            DesiredState::Running => Verb::Start,
            DesiredState::Stopped => Verb::Stop,
            DesiredState::Restarted => Verb::Restart,
            DesiredState::Enabled => Verb::Enable,
            DesiredState::Disabled => Verb::Disable,
        }
    }
}

impl FromStr for DesiredState {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" | "start" | "started" => Ok(DesiredState::Running),
            "stopped" | "stop" => Ok(DesiredState::Stopped),
            "restarted" | "restart" => Ok(DesiredState::Restarted),
            "enabled" | "enable" => Ok(DesiredState::Enabled),
            "disabled" | "disable" => Ok(DesiredState::Disabled),
            other => Err(ControlError::validation(
                ValidationErrorKind::InvalidParameter {
                    param: "ensure".to_string(),
                    message: format!("unknown state '{}'", other),
                },
            )),
        }
    }
}

/// State read back from the control binary. Never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservedState {
    Running,
    Stopped,
    Enabled,
    Disabled,
    Unknown,
}

impl fmt::Display for ObservedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObservedState::Running => "running",
            ObservedState::Stopped => "stopped",
            ObservedState::Enabled => "enabled",
            ObservedState::Disabled => "disabled",
            ObservedState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Successful execution of one control verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub service: ServiceName,
    pub verb: Verb,
    pub state: ObservedState,
}

/// Result of driving a service toward a desired state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum Applied {
    /// The command ran and succeeded.
    Executed(Outcome),
    /// The command was composed for the caller to run.
    Deferred(ServiceCommand),
}

impl Applied {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Applied::Deferred(_))
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Applied::Executed(outcome) => Some(outcome),
            Applied::Deferred(_) => None,
        }
    }
}
