//! # Entity Identity
//!
//! Entities are opaque 64-bit handles consisting of:
//! - An index into the entity table (upper 32 bits)
//! - A version counter for safe reuse (lower 32 bits)

use std::fmt;

use super::component::{ComponentMask, ComponentTypeId};

/// Index value reserved for dead/invalid handles.
pub const SENTINEL_INDEX: u32 = u32::MAX;

/// Unique identifier for an entity.
///
/// The ID is split into two parts:
/// - Upper 32 bits: Index into the entity table
/// - Lower 32 bits: Version counter for detecting stale references
///
/// A handle whose index equals [`SENTINEL_INDEX`] is invalid regardless of
/// its version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// The canonical invalid handle: sentinel index, version 0.
    pub const INVALID: Self = Self::new(SENTINEL_INDEX, 0);

    /// Creates a new entity ID from index and version.
    ///
    /// # Arguments
    ///
    /// * `index` - The entity table index (0 to 2^32-2 for live handles)
    /// * `version` - The version counter (0 to 2^32-1)
    #[inline]
    #[must_use]
    pub const fn new(index: u32, version: u32) -> Self {
        Self(((index as u64) << 32) | (version as u64))
    }

    /// Returns the index portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Returns the version portion of the entity ID.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn version(self) -> u32 {
        self.0 as u32
    }

    /// Returns `true` unless the index is the sentinel.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.index() != SENTINEL_INDEX
    }

    /// Returns the packed 64-bit representation.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Rebuilds a handle from its packed representation.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}:{}", self.index(), self.version())
        } else {
            write!(f, "invalid")
        }
    }
}

/// One entry of the entity table.
///
/// Holds the identity of whichever entity currently occupies the slot and
/// the mask of component types attached to it. A slot whose `id` is invalid
/// is free; its version is carried in `id` until the index is recycled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntitySlot {
    /// Identity of the current occupant.
    pub id: EntityId,
    /// Component types attached to the current occupant.
    pub mask: ComponentMask,
}

impl EntitySlot {
    /// Creates an occupied slot with an empty mask.
    #[inline]
    #[must_use]
    pub const fn new(id: EntityId) -> Self {
        Self {
            id,
            mask: ComponentMask::EMPTY,
        }
    }

    /// Returns `true` if the slot is currently occupied.
    #[inline]
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.id.is_valid()
    }

    /// Checks if this slot has a specific component.
    #[inline]
    #[must_use]
    pub const fn has_component(&self, component: ComponentTypeId) -> bool {
        self.mask.contains(component)
    }

    /// Adds a component flag to this slot.
    #[inline]
    pub fn add_component(&mut self, component: ComponentTypeId) {
        self.mask.insert(component);
    }

    /// Removes a component flag from this slot.
    #[inline]
    pub fn remove_component(&mut self, component: ComponentTypeId) {
        self.mask.remove(component);
    }
}
