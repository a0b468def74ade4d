//! Declarative service resources.
//!
//! A resource names a service, an optional one-shot `action`
//! (start/stop/restart) and the state to `ensure` (running by default).
//! Manifests hold several resources as `[[service]]` tables and are applied
//! in file order.

mod declaration;
mod manifest;

pub use declaration::{Action, ResourceReport, ServiceResource};
pub use manifest::{Manifest, ManifestEntry, ManifestReport};
