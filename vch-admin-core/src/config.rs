//! Wizard configuration
//!
//! Deployments tune the form's starting values through a small TOML section.
//! The configuration is handed to the step once at construction; it is not
//! hot-reloaded.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{VchAdminError, VchResult};
use crate::validation::{CapacityField, NumericRule};

/// Complete wizard-step configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Starting values for the capacity form fields.
    pub defaults: FieldDefaults,

    /// Whether the step opens with reservation/shares fields active.
    pub start_in_advanced_mode: bool,
}

/// Default values for the six capacity fields.
///
/// Shares defaults mirror the console's "normal" preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDefaults {
    pub cpu_limit: String,
    pub memory_limit: String,
    pub cpu_reservation: String,
    pub memory_reservation: String,
    pub cpu_shares: String,
    pub memory_shares: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            defaults: FieldDefaults::default(),
            start_in_advanced_mode: false,
        }
    }
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            cpu_limit: "Unlimited".to_string(),
            memory_limit: "Unlimited".to_string(),
            cpu_reservation: "1".to_string(),
            memory_reservation: "1".to_string(),
            cpu_shares: "4000".to_string(),
            memory_shares: "163840".to_string(),
        }
    }
}

impl FieldDefaults {
    pub fn value(&self, field: CapacityField) -> &str {
        match field {
            CapacityField::CpuLimit => &self.cpu_limit,
            CapacityField::MemoryLimit => &self.memory_limit,
            CapacityField::CpuReservation => &self.cpu_reservation,
            CapacityField::MemoryReservation => &self.memory_reservation,
            CapacityField::CpuShares => &self.cpu_shares,
            CapacityField::MemoryShares => &self.memory_shares,
        }
    }
}

impl WizardConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> VchResult<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            VchAdminError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> VchResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| VchAdminError::ConfigError(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// Every default must pass the rule of the field it seeds, with no
    /// dynamic bound applied (bounds only exist once a resource is selected).
    pub fn validate(&self) -> VchResult<()> {
        for field in CapacityField::ALL {
            let rule = NumericRule {
                required: true,
                allow_unlimited: field.is_limit(),
                min: 1,
            };
            if let Some(error) = rule.check(self.defaults.value(field), None) {
                return Err(VchAdminError::Validation {
                    field: field.key().to_string(),
                    message: format!("default value is invalid: {}", error),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        WizardConfig::default().validate().unwrap();
    }

    #[test]
    fn parses_partial_toml() {
        let config = WizardConfig::from_toml_str(
            r#"
            start_in_advanced_mode = true

            [defaults]
            cpu_limit = "2048"
            "#,
        )
        .unwrap();
        assert!(config.start_in_advanced_mode);
        assert_eq!(config.defaults.cpu_limit, "2048");
        // Unspecified fields keep their defaults.
        assert_eq!(config.defaults.memory_limit, "Unlimited");
    }

    #[test]
    fn rejects_non_numeric_default() {
        let err = WizardConfig::from_toml_str(
            r#"
            [defaults]
            cpu_reservation = "lots"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, VchAdminError::Validation { .. }));
    }

    #[test]
    fn rejects_unlimited_outside_limit_fields() {
        let err = WizardConfig::from_toml_str(
            r#"
            [defaults]
            memory_shares = "Unlimited"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, VchAdminError::Validation { .. }));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = WizardConfig::from_toml_str("defaults = 3").unwrap_err();
        assert!(matches!(err, VchAdminError::ConfigError(_)));
    }
}
