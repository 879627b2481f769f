//! # Component Types
//!
//! Components are plain data attached to entities. Each distinct component
//! type is assigned a small integer id the first time a [`World`] sees it;
//! that id indexes both the per-slot [`ComponentMask`] and the pool list.
//!
//! Ids are owned by a per-world [`ComponentRegistry`], so two worlds never
//! share or race on id assignment.
//!
//! [`World`]: super::World

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{WorldError, WorldResult};

/// Maximum number of component types a single world can track.
///
/// Bounded by the width of [`ComponentMask`].
pub const MAX_COMPONENT_TYPES: usize = 64;

/// Marker trait for component types.
///
/// Any owned `'static` type can be a component, including types that own
/// heap memory or implement [`Drop`]: pools run destructors when a component
/// is removed, overwritten, or its entity is destroyed.
///
/// # Example
///
/// ```rust
/// use roster_core::Component;
///
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: 'static {}

/// Dense identifier of a component type within one world (0-63).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(u8);

impl ComponentTypeId {
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn from_index(index: usize) -> Self {
        debug_assert!(index < MAX_COMPONENT_TYPES);
        Self(index as u8)
    }

    /// Returns the id as an index into masks and pool lists.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Fixed-width set of component type ids.
///
/// Bit `n` is set when the component type with id `n` is present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ComponentMask(u64);

impl ComponentMask {
    /// The mask with no bits set.
    pub const EMPTY: Self = Self(0);

    /// Returns a mask containing exactly `id`.
    #[inline]
    #[must_use]
    pub const fn single(id: ComponentTypeId) -> Self {
        Self(1u64 << id.0)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Sets the bit for `id`.
    #[inline]
    pub fn insert(&mut self, id: ComponentTypeId) {
        self.0 |= 1u64 << id.0;
    }

    /// Clears the bit for `id`.
    #[inline]
    pub fn remove(&mut self, id: ComponentTypeId) {
        self.0 &= !(1u64 << id.0);
    }

    /// Checks whether the bit for `id` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, id: ComponentTypeId) -> bool {
        (self.0 & (1u64 << id.0)) != 0
    }

    /// Checks whether every bit of `required` is also set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains_all(self, required: Self) -> bool {
        (self.0 & required.0) == required.0
    }

    /// Returns the union of both masks.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Clears every bit.
    #[inline]
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Returns `true` if no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of set bits.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates over the set ids in ascending order.
    #[inline]
    #[must_use]
    pub fn iter(self) -> MaskIter {
        MaskIter { remaining: self.0 }
    }
}

impl FromIterator<ComponentTypeId> for ComponentMask {
    fn from_iter<I: IntoIterator<Item = ComponentTypeId>>(iter: I) -> Self {
        let mut mask = Self::EMPTY;
        for id in iter {
            mask.insert(id);
        }
        mask
    }
}

impl IntoIterator for ComponentMask {
    type Item = ComponentTypeId;
    type IntoIter = MaskIter;

    fn into_iter(self) -> MaskIter {
        self.iter()
    }
}

/// Iterator over the ids set in a [`ComponentMask`].
#[derive(Clone, Debug)]
pub struct MaskIter {
    remaining: u64,
}

impl Iterator for MaskIter {
    type Item = ComponentTypeId;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // Lowest set bit first
        let bit = self.remaining.trailing_zeros() as usize;
        self.remaining &= self.remaining - 1;
        Some(ComponentTypeId::from_index(bit))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for MaskIter {}

/// Maps Rust component types to dense [`ComponentTypeId`]s.
///
/// Ids are handed out in registration order starting at 0 and stay stable
/// for the registry's lifetime.
#[derive(Debug)]
pub struct ComponentRegistry {
    ids: HashMap<TypeId, ComponentTypeId>,
    names: Vec<&'static str>,
    limit: usize,
}

impl ComponentRegistry {
    /// Creates an empty registry accepting at most `limit` types.
    ///
    /// # Panics
    ///
    /// Panics if `limit` exceeds [`MAX_COMPONENT_TYPES`].
    #[must_use]
    pub fn new(limit: usize) -> Self {
        assert!(
            limit <= MAX_COMPONENT_TYPES,
            "Component type limit cannot exceed {MAX_COMPONENT_TYPES}"
        );
        Self {
            ids: HashMap::with_capacity(limit),
            names: Vec::with_capacity(limit),
            limit,
        }
    }

    /// Returns the id for `C`, assigning the next free id on first use.
    ///
    /// # Errors
    ///
    /// [`WorldError::ComponentTypeLimit`] if `C` is new and the registry is
    /// full.
    pub fn register<C: Component>(&mut self) -> WorldResult<ComponentTypeId> {
        if let Some(&id) = self.ids.get(&TypeId::of::<C>()) {
            return Ok(id);
        }

        if self.names.len() >= self.limit {
            warn!(
                component = type_name::<C>(),
                limit = self.limit,
                "component type limit reached"
            );
            return Err(WorldError::ComponentTypeLimit { limit: self.limit });
        }

        let id = ComponentTypeId::from_index(self.names.len());
        self.ids.insert(TypeId::of::<C>(), id);
        self.names.push(type_name::<C>());
        debug!(component = type_name::<C>(), id = id.index(), "registered component type");
        Ok(id)
    }

    /// Looks up the id for `C` without registering it.
    #[inline]
    #[must_use]
    pub fn id_of<C: Component>(&self) -> Option<ComponentTypeId> {
        self.ids.get(&TypeId::of::<C>()).copied()
    }

    /// Returns the Rust type name registered under `id`.
    #[must_use]
    pub fn name_of(&self, id: ComponentTypeId) -> Option<&'static str> {
        self.names.get(id.index()).copied()
    }

    /// Returns the number of registered types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no type has been registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the maximum number of types this registry accepts.
    #[inline]
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new(MAX_COMPONENT_TYPES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position;
    impl Component for Position {}

    struct Velocity;
    impl Component for Velocity {}

    struct Marker;
    impl Component for Marker {}

    #[test]
    fn test_registry_assigns_dense_ids() {
        let mut registry = ComponentRegistry::default();
        assert!(registry.is_empty());

        let position = registry.register::<Position>().unwrap();
        let velocity = registry.register::<Velocity>().unwrap();
        assert_eq!(position.index(), 0);
        assert_eq!(velocity.index(), 1);

        // Re-registering returns the same id
        assert_eq!(registry.register::<Position>().unwrap(), position);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registry_lookup_does_not_register() {
        let mut registry = ComponentRegistry::default();
        assert!(registry.id_of::<Marker>().is_none());
        assert!(registry.is_empty());

        let id = registry.register::<Marker>().unwrap();
        assert_eq!(registry.id_of::<Marker>(), Some(id));
        assert!(registry.name_of(id).unwrap().ends_with("Marker"));
    }

    #[test]
    fn test_registry_limit() {
        let mut registry = ComponentRegistry::new(2);
        assert_eq!(registry.limit(), 2);
        assert_eq!(ComponentRegistry::default().limit(), MAX_COMPONENT_TYPES);
        registry.register::<Position>().unwrap();
        registry.register::<Velocity>().unwrap();

        let err = registry.register::<Marker>().unwrap_err();
        assert_eq!(err, WorldError::ComponentTypeLimit { limit: 2 });
        // Known types still resolve
        assert!(registry.register::<Velocity>().is_ok());
    }

    #[test]
    fn test_registries_are_independent() {
        let mut a = ComponentRegistry::default();
        let mut b = ComponentRegistry::default();

        a.register::<Position>().unwrap();
        let velocity_in_a = a.register::<Velocity>().unwrap();
        let velocity_in_b = b.register::<Velocity>().unwrap();

        assert_eq!(velocity_in_a.index(), 1);
        assert_eq!(velocity_in_b.index(), 0);
    }

    #[test]
    fn test_mask_superset() {
        let a = ComponentTypeId::from_index(0);
        let b = ComponentTypeId::from_index(5);
        let c = ComponentTypeId::from_index(63);

        let mut mask = ComponentMask::EMPTY;
        mask.insert(a);
        mask.insert(c);

        assert!(mask.contains_all(ComponentMask::single(a)));
        assert!(mask.contains_all(ComponentMask::EMPTY));
        assert!(!mask.contains_all([a, b].into_iter().collect()));

        mask.insert(b);
        assert!(mask.contains_all([a, b].into_iter().collect()));
        assert_eq!(mask.len(), 3);

        mask.remove(a);
        assert!(!mask.contains(a));
        mask.clear();
        assert!(mask.is_empty());
    }

    #[test]
    fn test_mask_iter_ascending() {
        let mask: ComponentMask = [9, 2, 63, 0]
            .into_iter()
            .map(ComponentTypeId::from_index)
            .collect();
        let ids: Vec<usize> = mask.iter().map(ComponentTypeId::index).collect();
        assert_eq!(ids, vec![0, 2, 9, 63]);
        assert_eq!(mask.iter().len(), 4);
    }
}
