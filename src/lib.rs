//! unitctl library
//!
//! This crate provides a service lifecycle controller that maps
//! start/stop/restart/enable/disable intents onto invocations of a service
//! control binary such as `systemctl`, plus the settings, process execution
//! and declarative resource layers around it.

pub mod config;
pub mod error;
pub mod executor;
pub mod resource;
pub mod service;
