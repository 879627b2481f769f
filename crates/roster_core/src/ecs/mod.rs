//! # Entity Component Store
//!
//! Heterogeneous, independently typed components attached to lightweight
//! generational entity handles.
//!
//! ## Design Philosophy
//!
//! - Entity handles pack a table index and a version counter
//! - Destroyed indices are recycled with a bumped version
//! - Each component type gets one fixed-capacity pool, indexed by entity index
//! - Queries filter the entity table by component mask, lazily

mod component;
mod entity;
mod query;
mod storage;
mod world;

pub use component::{
    Component, ComponentMask, ComponentRegistry, ComponentTypeId, MaskIter, MAX_COMPONENT_TYPES,
};
pub use entity::{EntityId, EntitySlot, SENTINEL_INDEX};
pub use query::{ComponentSet, QueryBuilder, RosterView};
pub use storage::{ComponentPool, ErasedPool};
pub use world::World;
