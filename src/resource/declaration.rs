//! A single service resource.

use serde::{Deserialize, Serialize};

use crate::error::ControlResult;
use crate::executor::CommandRunner;
use crate::service::{Applied, DesiredState, ObservedState, ServiceController};

/// One-shot action requested alongside a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Start,
    Stop,
    Restart,
}

impl From<Action> for DesiredState {
    fn from(action: Action) -> Self {
        match action {
            Action::Start => DesiredState::Running,
            Action::Stop => DesiredState::Stopped,
            Action::Restart => DesiredState::Restarted,
        }
    }
}

/// Declared intent for one service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceResource {
    pub service: String,
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(default)]
    pub ensure: DesiredState,
}

/// What applying a resource did, plus the state read back afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceReport {
    pub applied: Applied,
    pub observed: ObservedState,
}

impl ServiceResource {
    pub fn new(service: impl Into<String>, ensure: DesiredState) -> Self {
        Self {
            service: service.into(),
            action: None,
            ensure,
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// The state this resource drives toward; `action` wins over `ensure`.
    pub fn target(&self) -> DesiredState {
        self.action.map(DesiredState::from).unwrap_or(self.ensure)
    }

    /// Apply the resource and query the resulting state.
    ///
    /// Run-state targets are read back with `is-active`, enablement targets
    /// with `is-enabled`. A deferred disable is not queried.
    pub fn apply<R: CommandRunner>(
        &self,
        controller: &ServiceController<R>,
    ) -> ControlResult<ResourceReport> {
        let target = self.target();
        let applied = controller.converge(&self.service, target)?;

        let observed = match (&applied, target) {
            (Applied::Deferred(_), _) => ObservedState::Unknown,
            (_, DesiredState::Enabled | DesiredState::Disabled) => {
                controller.is_enabled(&self.service)?
            }
            _ => controller.is_active(&self.service)?,
        };

        Ok(ResourceReport { applied, observed })
    }
}
