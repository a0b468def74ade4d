//! Command executor module.
//!
//! Handles safe subprocess spawning, execution timeouts and the
//! `CommandRunner` seam the controller executes through.

mod output;
mod runner;
mod subprocess;

pub use output::tail_output;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use subprocess::{SubprocessBuilder, SubprocessResult};

#[cfg(test)]
pub(crate) mod testing;
