//! Configuration module for the service controller.
//!
//! Handles loading and validating settings from TOML files.

mod settings;

pub use settings::*;
