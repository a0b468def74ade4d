//! Service lifecycle control.
//!
//! Maps start/stop/restart/enable/disable intents for a named service onto
//! invocations of the service control binary (`systemctl` by default):
//! - `start`, `stop`, `restart` - compose and execute
//! - `enable` - compose and execute, failures re-wrapped with the service name
//! - `disable` - compose only, or execute when configured to
//! - `is-enabled`, `is-active` - query the current state

mod command;
mod controller;
mod name;
mod state;

pub use command::{ServiceCommand, Verb};
pub use controller::{ControllerConfig, ServiceController};
pub use name::ServiceName;
pub use state::{Applied, DesiredState, ObservedState, Outcome};
