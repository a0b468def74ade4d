//! The service controller.
//!
//! Each operation validates the service name, composes exactly one
//! `[binary, verb, service]` invocation, runs it through the configured
//! [`CommandRunner`] and interprets the exit status. Nothing is retried and
//! no state is kept between calls.

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::error::{CommandErrorKind, ControlError, ControlResult, ValidationErrorKind};
use crate::executor::{CommandOutput, CommandRunner, SystemRunner};

use super::command::{ServiceCommand, Verb};
use super::name::ServiceName;
use super::state::{Applied, DesiredState, ObservedState, Outcome};

/// Construction-time configuration of a [`ServiceController`].
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Path to the service control binary.
    pub binary_path: PathBuf,
    /// Upper bound on a single invocation.
    pub timeout: Duration,
    /// When false, `disable` only composes its command.
    pub execute_on_disable: bool,
    /// Services the controller may act on. Empty allows any service.
    pub allowed_services: Vec<String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            binary_path: PathBuf::from("/bin/systemctl"),
            timeout: Duration::from_secs(60),
            execute_on_disable: false,
            allowed_services: Vec::new(),
        }
    }
}

/// Drives services through the control binary.
#[derive(Debug, Clone)]
pub struct ServiceController<R = SystemRunner> {
    config: ControllerConfig,
    runner: R,
}

impl ServiceController<SystemRunner> {
    /// Create a controller that spawns real processes.
    pub fn new(config: ControllerConfig) -> Self {
        Self::with_runner(config, SystemRunner::new())
    }
}

impl<R: CommandRunner> ServiceController<R> {
    pub fn with_runner(config: ControllerConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Validate a raw name against the emptiness rule and the allowlist.
    pub fn service_name(&self, name: &str) -> ControlResult<ServiceName> {
        let service = ServiceName::new(name)?;
        if !self.config.allowed_services.is_empty()
            && !self.config.allowed_services.iter().any(|s| s == name)
        {
            return Err(ControlError::validation(
                ValidationErrorKind::UnknownService {
                    service: name.to_string(),
                },
            ));
        }
        Ok(service)
    }

    /// Compose the command for `verb` without running it.
    pub fn compose(&self, verb: Verb, name: &str) -> ControlResult<ServiceCommand> {
        let service = self.service_name(name)?;
        Ok(self.command_for(verb, service))
    }

    fn command_for(&self, verb: Verb, service: ServiceName) -> ServiceCommand {
        ServiceCommand::new(self.config.binary_path.clone(), verb, service)
    }

    fn invoke(&self, command: &ServiceCommand) -> ControlResult<CommandOutput> {
        debug!(
            service = %command.service,
            verb = %command.verb,
            "Invoking control binary"
        );
        self.runner.run(&command.argv(), self.config.timeout)
    }

    /// Run `command` and require a zero exit status.
    fn execute(&self, command: ServiceCommand) -> ControlResult<Outcome> {
        let output = self.invoke(&command)?;
        if !output.success() {
            return Err(ControlError::command(CommandErrorKind::NonZeroExit {
                command: command.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            }));
        }

        Ok(Outcome {
            state: command.verb.implied_state(),
            verb: command.verb,
            service: command.service,
        })
    }

    fn execute_verb(&self, verb: Verb, name: &str) -> ControlResult<Outcome> {
        let command = self.compose(verb, name)?;
        self.execute(command)
    }

    /// `systemctl start <name>`.
    pub fn start(&self, name: &str) -> ControlResult<Outcome> {
        self.execute_verb(Verb::Start, name)
    }

    /// `systemctl stop <name>`.
    pub fn stop(&self, name: &str) -> ControlResult<Outcome> {
        self.execute_verb(Verb::Stop, name)
    }

    /// `systemctl restart <name>`.
    pub fn restart(&self, name: &str) -> ControlResult<Outcome> {
        self.execute_verb(Verb::Restart, name)
    }

    /// `systemctl enable <name>`.
    ///
    /// Execution failures are re-wrapped as [`ControlError::Enable`] naming
    /// the service. Timeouts are returned unwrapped.
    pub fn enable(&self, name: &str) -> ControlResult<Outcome> {
        let command = self.compose(Verb::Enable, name)?;
        let service = command.service.to_string();
        self.execute(command).map_err(|e| match e {
            ControlError::Command {
                kind: CommandErrorKind::Timeout { .. },
            } => e,
            ControlError::Command { .. } => ControlError::Enable {
                service,
                source: Box::new(e),
            },
            other => other,
        })
    }

    /// `systemctl disable <name>`.
    ///
    /// Unless `execute_on_disable` is set, the command is returned as
    /// [`Applied::Deferred`] and the runner is never called.
    pub fn disable(&self, name: &str) -> ControlResult<Applied> {
        let command = self.compose(Verb::Disable, name)?;
        if !self.config.execute_on_disable {
            return Ok(Applied::Deferred(command));
        }
        self.execute(command).map(Applied::Executed)
    }

    /// `systemctl is-enabled <name>`.
    ///
    /// Exit status 0 is `Enabled`; anything else, including a failure to run
    /// the binary at all, is `Disabled`. Use [`probe_enabled`] to tell the
    /// two apart.
    ///
    /// [`probe_enabled`]: ServiceController::probe_enabled
    pub fn is_enabled(&self, name: &str) -> ControlResult<ObservedState> {
        let command = self.compose(Verb::IsEnabled, name)?;
        match self.invoke(&command) {
            Ok(output) if output.success() => Ok(ObservedState::Enabled),
            _ => Ok(ObservedState::Disabled),
        }
    }

    /// `systemctl is-enabled <name>`, reporting `Unknown` when the answer
    /// could not be determined.
    ///
    /// A non-zero exit counts as `Disabled` only when the binary printed an
    /// enablement state (`disabled`, `masked`, `static`, ...).
    pub fn probe_enabled(&self, name: &str) -> ControlResult<ObservedState> {
        let command = self.compose(Verb::IsEnabled, name)?;
        Ok(match self.invoke(&command) {
            Ok(output) if output.success() => ObservedState::Enabled,
            Ok(output) if answered(&output) => ObservedState::Disabled,
            _ => ObservedState::Unknown,
        })
    }

    /// `systemctl is-active <name>`.
    ///
    /// `Running` on exit 0, `Stopped` when the binary reported an inactive
    /// state, otherwise `Unknown`.
    pub fn is_active(&self, name: &str) -> ControlResult<ObservedState> {
        let command = self.compose(Verb::IsActive, name)?;
        Ok(match self.invoke(&command) {
            Ok(output) if output.success() => ObservedState::Running,
            Ok(output) if answered(&output) => ObservedState::Stopped,
            _ => ObservedState::Unknown,
        })
    }

    /// Drive `name` toward `desired` with the matching operation.
    pub fn converge(&self, name: &str, desired: DesiredState) -> ControlResult<Applied> {
        match desired.verb() {
            Verb::Enable => self.enable(name).map(Applied::Executed),
            Verb::Disable => self.disable(name),
            verb => self.execute_verb(verb, name).map(Applied::Executed),
        }
    }
}

/// A non-zero exit that still printed a state word on stdout.
fn answered(output: &CommandOutput) -> bool {
    output.exit_code.is_some()
        && output
            .stdout
            .lines()
            .next()
            .map(|line| !line.trim().is_empty())
            .unwrap_or(false)
}
