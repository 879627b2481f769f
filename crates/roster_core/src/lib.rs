//! # ROSTER Core
//!
//! In-process entity-component store for real-time simulation loops:
//! - Entities are created and destroyed at high frequency
//! - Components of any type are attached per entity
//! - Queries over component combinations run every frame
//!
//! ## Guarantees
//!
//! 1. **Stale handles are rejected** - every access compares the full
//!    (index, version) identity against the entity table
//! 2. **Fixed capacity** - pools are sized once and never relocate
//! 3. **Borrow-checked iteration** - a [`RosterView`] borrows the world, so
//!    it cannot observe structural mutation
//!
//! ## Example
//!
//! ```rust
//! use roster_core::{Component, World};
//!
//! struct Position { x: f32 }
//! impl Component for Position {}
//! struct Marker;
//! impl Component for Marker {}
//!
//! let mut world = World::new(1_000);
//! let e1 = world.new_entity();
//! let e2 = world.new_entity();
//! world.assign(e1, Position { x: 1.0 });
//! world.assign(e2, Position { x: 2.0 });
//! world.assign(e2, Marker);
//!
//! let xs: Vec<f32> = world
//!     .view::<(Position, Marker)>()
//!     .filter_map(|id| world.get::<Position>(id).map(|p| p.x))
//!     .collect();
//! assert_eq!(xs, vec![2.0]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;

pub use config::WorldConfig;
pub use ecs::{
    Component, ComponentMask, ComponentPool, ComponentRegistry, ComponentSet, ComponentTypeId,
    EntityId, EntitySlot, ErasedPool, QueryBuilder, RosterView, World, MAX_COMPONENT_TYPES,
    SENTINEL_INDEX,
};
pub use error::{ConfigError, WorldError, WorldResult};
