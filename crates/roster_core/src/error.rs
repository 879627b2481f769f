//! # Error Types
//!
//! All errors that can occur in the entity store.

use std::path::PathBuf;

use thiserror::Error;

use crate::ecs::EntityId;

/// Errors that can occur while operating on a [`World`](crate::World).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// Every entity slot is occupied by a live entity.
    #[error("entity capacity exhausted: all {capacity} slots are alive")]
    EntityCapacityExhausted {
        /// Maximum number of simultaneously live entities.
        capacity: usize,
    },

    /// A new component type was used after the type limit was reached.
    #[error("component type limit reached: at most {limit} types per world")]
    ComponentTypeLimit {
        /// Configured number of component types.
        limit: usize,
    },

    /// The handle does not identify the slot's current occupant.
    #[error("stale or invalid entity handle {0}")]
    StaleEntity(EntityId),

    /// A pool was addressed beyond its fixed capacity.
    #[error("slot {index} out of bounds for pool of capacity {capacity}")]
    SlotOutOfBounds {
        /// The requested slot.
        index: usize,
        /// The pool's capacity.
        capacity: usize,
    },

    /// The pool registered under a component id holds a different type.
    #[error("pool for component {name} holds a different type")]
    PoolTypeMismatch {
        /// Rust type name of the requested component.
        name: &'static str,
    },
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;

/// Errors raised while loading or validating a [`WorldConfig`](crate::WorldConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The values parsed but violate a limit.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
