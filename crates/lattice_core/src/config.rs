//! # ECS Configuration
//!
//! Store sizing, loaded once at startup from TOML:
//!
//! ```toml
//! [stores]
//! max_components = 1000
//! reserve = 0
//! ```
//!
//! Every key is optional and falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ecs::StoreLimits;
use crate::error::{EcsError, EcsResult};

/// Top-level ECS configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcsConfig {
    /// Limits applied to every component store.
    pub stores: StoreLimits,
}

impl EcsConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] on malformed TOML or invalid values.
    pub fn from_toml_str(source: &str) -> EcsResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|err| EcsError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> EcsResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|err| EcsError::InvalidConfig(format!("{}: {err}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> EcsResult<String> {
        toml::to_string(self).map_err(|err| EcsError::InvalidConfig(err.to_string()))
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if `max_components` is zero or
    /// `reserve` exceeds it.
    pub fn validate(&self) -> EcsResult<()> {
        let stores = &self.stores;
        if stores.max_components == 0 {
            return Err(EcsError::InvalidConfig(
                "stores.max_components must be greater than zero".to_owned(),
            ));
        }
        if stores.reserve > stores.max_components {
            return Err(EcsError::InvalidConfig(format!(
                "stores.reserve ({}) exceeds stores.max_components ({})",
                stores.reserve, stores.max_components
            )));
        }
        Ok(())
    }
}
