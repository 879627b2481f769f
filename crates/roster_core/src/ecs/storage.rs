//! # Component Pools
//!
//! Pre-allocated, fixed-capacity storage for one component type.
//!
//! The pool uses a dense slot strategy:
//! - All slots are allocated at creation and never reallocated
//! - Slot `i` belongs to entity-table index `i`
//! - Every access is bounds-checked
//! - Destructors run when a slot is cleared or overwritten

use std::any::{type_name, Any};

use super::component::Component;
use crate::error::{WorldError, WorldResult};

/// Fixed-capacity storage for a single component type.
///
/// This storage guarantees:
/// - One allocation, at construction
/// - O(1) access by slot index
/// - Stable addresses: the slot array never relocates
///
/// # Type Parameters
///
/// * `C` - The component type to store
///
/// # Example
///
/// ```rust
/// use roster_core::{Component, ComponentPool};
///
/// struct Health(u32);
/// impl Component for Health {}
///
/// let mut pool: ComponentPool<Health> = ComponentPool::new(16);
/// pool.construct(3, Health(100)).unwrap();
/// assert_eq!(pool.get(3).map(|h| h.0), Some(100));
/// ```
pub struct ComponentPool<C: Component> {
    /// One slot per entity index.
    slots: Box<[Option<C>]>,
    /// Number of constructed slots.
    len: usize,
}

impl<C: Component> ComponentPool<C> {
    /// Creates a pool with `capacity` empty slots.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        let slots = (0..capacity).map(|_| None).collect::<Vec<_>>().into_boxed_slice();

        Self { slots, len: 0 }
    }

    /// Returns the capacity of this pool.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the size of one component in bytes.
    #[inline]
    #[must_use]
    pub const fn element_size(&self) -> usize {
        std::mem::size_of::<C>()
    }

    /// Returns the number of constructed slots.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is constructed.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Constructs `value` in slot `index`, dropping any previous occupant.
    ///
    /// # Errors
    ///
    /// [`WorldError::SlotOutOfBounds`] if `index` is beyond the capacity.
    pub fn construct(&mut self, index: usize, value: C) -> WorldResult<&mut C> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(WorldError::SlotOutOfBounds { index, capacity })?;

        if slot.is_none() {
            self.len += 1;
        }
        Ok(slot.insert(value))
    }

    /// Moves the component out of slot `index`, leaving it empty.
    ///
    /// Returns `None` if the slot is empty or out of bounds.
    pub fn destruct(&mut self, index: usize) -> Option<C> {
        let value = self.slots.get_mut(index)?.take()?;
        self.len -= 1;
        Some(value)
    }

    /// Returns `true` if slot `index` holds a component.
    #[inline]
    #[must_use]
    pub fn is_constructed(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// Gets the component in slot `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&C> {
        self.slots.get(index)?.as_ref()
    }

    /// Gets the component in slot `index` mutably.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut C> {
        self.slots.get_mut(index)?.as_mut()
    }

    /// Iterates over constructed slots with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &C)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|c| (index, c)))
    }

    /// Drops every constructed component. Capacity is kept.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.len = 0;
    }
}

/// Type-erased view of a [`ComponentPool`], so a world can hold pools of
/// different component types side by side.
pub trait ErasedPool {
    /// Upcast for downcasting to the concrete pool.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete pool.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Drops the component in slot `index`, if any. Returns `true` if a
    /// component was dropped.
    fn destruct_slot(&mut self, index: usize) -> bool;

    /// Number of constructed slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slot is constructed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rust type name of the stored component.
    fn component_name(&self) -> &'static str;
}

impl<C: Component> ErasedPool for ComponentPool<C> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn destruct_slot(&mut self, index: usize) -> bool {
        self.destruct(index).is_some()
    }

    fn len(&self) -> usize {
        ComponentPool::len(self)
    }

    fn component_name(&self) -> &'static str {
        type_name::<C>()
    }
}
