//! Error types for the service controller.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
