//! # World Configuration
//!
//! Capacities are fixed when a [`World`](crate::World) is built. They can be
//! supplied in code or loaded once at startup from TOML:
//!
//! ```toml
//! max_entities = 100000
//! max_component_types = 32
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ecs::{MAX_COMPONENT_TYPES, SENTINEL_INDEX};
use crate::error::ConfigError;

/// Default entity capacity.
pub const DEFAULT_MAX_ENTITIES: usize = 1_000_000;

/// Fixed capacities for a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Maximum number of simultaneously live entities. Every component pool
    /// is sized to this many slots.
    pub max_entities: usize,
    /// Maximum number of distinct component types (at most 64).
    pub max_component_types: usize,
}

impl WorldConfig {
    /// Creates a config with the given entity capacity and the full
    /// component type range.
    #[must_use]
    pub const fn with_max_entities(max_entities: usize) -> Self {
        Self {
            max_entities,
            max_component_types: MAX_COMPONENT_TYPES,
        }
    }

    /// Parses and validates a config from a TOML string.
    ///
    /// Missing keys fall back to [`WorldConfig::default`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML or unknown keys,
    /// [`ConfigError::Invalid`] if a limit is out of range.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`WorldConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks that both limits are in range.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] describing the first violated limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entities == 0 {
            return Err(ConfigError::Invalid(
                "max_entities must be greater than zero".to_owned(),
            ));
        }
        // The sentinel index is never handed out
        if self.max_entities > SENTINEL_INDEX as usize {
            return Err(ConfigError::Invalid(format!(
                "max_entities {} exceeds {}",
                self.max_entities, SENTINEL_INDEX
            )));
        }
        if self.max_component_types > MAX_COMPONENT_TYPES {
            return Err(ConfigError::Invalid(format!(
                "max_component_types {} exceeds {}",
                self.max_component_types, MAX_COMPONENT_TYPES
            )));
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::with_max_entities(DEFAULT_MAX_ENTITIES)
    }
}
