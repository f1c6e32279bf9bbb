//! Collision system configuration

use serde::{Deserialize, Serialize};

use crate::error::{CollisionError, Result};

/// Settings shared by every body in a `CollisionSystem`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// AABB padding for bodies that do not set their own (default: 0.0)
    pub default_padding: f64,

    /// Cell edge length of the default spatial grid (default: 64.0)
    pub cell_size: f64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self { default_padding: 0.0, cell_size: 64.0 }
    }
}

impl SystemConfig {
    /// Set the default padding
    pub fn with_default_padding(mut self, padding: f64) -> Self {
        self.default_padding = padding;
        self
    }

    /// Set the grid cell size
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.default_padding.is_finite() || self.default_padding < 0.0 {
            return Err(CollisionError::InvalidConfig(format!(
                "default_padding must be finite and non-negative, got {}",
                self.default_padding
            )));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(CollisionError::InvalidConfig(format!(
                "cell_size must be finite and positive, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SystemConfig::default();
        assert_eq!(config.default_padding, 0.0);
        assert_eq!(config.cell_size, 64.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = SystemConfig::default().with_default_padding(2.0).with_cell_size(16.0);
        assert_eq!(config.default_padding, 2.0);
        assert_eq!(config.cell_size, 16.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            SystemConfig::default().with_default_padding(-1.0).validate(),
            Err(CollisionError::InvalidConfig(_))
        ));
        assert!(SystemConfig::default().with_default_padding(f64::NAN).validate().is_err());
        assert!(SystemConfig::default().with_cell_size(0.0).validate().is_err());
        assert!(SystemConfig::default().with_cell_size(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let config: SystemConfig = serde_json::from_str(r#"{ "cell_size": 8.0 }"#).unwrap();
        assert_eq!(config, SystemConfig::default().with_cell_size(8.0));
    }
}
