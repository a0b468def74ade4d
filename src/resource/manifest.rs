//! Manifests: ordered lists of service resources.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ControlError;
use crate::executor::CommandRunner;
use crate::service::ServiceController;

use super::declaration::{ResourceReport, ServiceResource};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, rename = "service")]
    pub services: Vec<ServiceResource>,
}

/// Per-resource outcome of applying a manifest.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ResourceReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestReport {
    pub entries: Vec<ManifestEntry>,
}

impl ManifestReport {
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_some()).count()
    }

    pub fn success(&self) -> bool {
        self.failures() == 0
    }
}

impl Manifest {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ControlError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ControlError::Config {
            message: format!("Failed to read manifest '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&content).map_err(|e| ControlError::Config {
            message: format!("Invalid manifest '{}': {}", path.display(), e),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ControlError> {
        toml::from_str(content).map_err(|e| ControlError::Config {
            message: e.to_string(),
        })
    }

    /// Apply every resource in order. A failing resource does not stop the
    /// ones after it.
    pub fn apply<R: CommandRunner>(&self, controller: &ServiceController<R>) -> ManifestReport {
        let entries = self
            .services
            .iter()
            .map(|resource| match resource.apply(controller) {
                Ok(report) => ManifestEntry {
                    service: resource.service.clone(),
                    report: Some(report),
                    error: None,
                },
                Err(e) => ManifestEntry {
                    service: resource.service.clone(),
                    report: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        ManifestReport { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Action;
    use crate::service::DesiredState;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::from_toml_str(
            r#"
            [[service]]
            service = "nginx"

            [[service]]
            service = "postgresql"
            ensure = "enabled"

            [[service]]
            service = "redis-server"
            action = "restart"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.services.len(), 3);
        assert_eq!(manifest.services[0].ensure, DesiredState::Running);
        assert_eq!(manifest.services[1].ensure, DesiredState::Enabled);
        assert_eq!(manifest.services[2].action, Some(Action::Restart));
    }

    #[test]
    fn test_empty_manifest() {
        assert!(Manifest::from_toml_str("").unwrap().services.is_empty());
    }

    #[test]
    fn test_invalid_ensure_rejected() {
        let err = Manifest::from_toml_str("[[service]]\nservice = \"x\"\nensure = \"paused\"\n")
            .unwrap_err();
        assert!(matches!(err, ControlError::Config { .. }));
    }

    #[test]
    fn test_apply_continues_after_failure() {
        use crate::executor::testing::ScriptedRunner;
        use crate::executor::CommandOutput;
        use crate::service::{ControllerConfig, ServiceController};

        let manifest = Manifest::from_toml_str(
            r#"
            [[service]]
            service = "broken"
            action = "restart"

            [[service]]
            service = "web"
            "#,
        )
        .unwrap();
        let ctl = ServiceController::with_runner(
            ControllerConfig::default(),
            ScriptedRunner::replying(vec![Ok(CommandOutput::new(1, "", "unit not found"))]),
        );

        let report = manifest.apply(&ctl);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.failures(), 1);
        assert!(!report.success());
        assert!(report.entries[0]
            .error
            .as_deref()
            .unwrap()
            .contains("unit not found"));
        assert!(report.entries[1].report.is_some());
        // restart, then start + is-active
        assert_eq!(ctl.runner().calls().len(), 3);
    }
}
