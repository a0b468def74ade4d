//! Service name validation.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{ControlError, ControlResult, ValidationErrorKind};

/// Identifier handed verbatim to the control binary.
///
/// The only structural rule is that it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Validate and wrap a service name.
    ///
    /// # Example
    ///
    /// ```
    /// use unitctl::service::ServiceName;
    ///
    /// assert!(ServiceName::new("nginx").is_ok());
    /// assert!(ServiceName::new("").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> ControlResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ControlError::validation(
                ValidationErrorKind::EmptyServiceName,
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ServiceName {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_service_name() {
        let result = ServiceName::new("");
        assert!(matches!(
            result,
            Err(ControlError::Validation {
                kind: ValidationErrorKind::EmptyServiceName
            })
        ));
    }

    #[test]
    fn test_name_kept_verbatim() {
        // No normalisation: the control binary sees exactly what was given
        for raw in ["nginx", "php8.3-fpm", "getty@tty1.service", " spaced "] {
            let name: ServiceName = raw.parse().unwrap();
            assert_eq!(name.as_str(), raw);
        }
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let name = ServiceName::new("redis-server").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"redis-server\"");
    }
}
