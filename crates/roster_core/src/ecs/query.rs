//! # Queries
//!
//! A query selects live entities whose component mask is a superset of a
//! required mask. Requirements are collected at runtime by a
//! [`QueryBuilder`], or statically through a [`ComponentSet`] tuple.
//!
//! [`RosterView`] borrows the world's entity table, so the world cannot be
//! structurally mutated while a view is alive:
//!
//! ```rust,compile_fail
//! use roster_core::World;
//!
//! let mut world = World::new(8);
//! world.new_entity();
//! for _ in world.view::<()>() {
//!     world.new_entity();
//! }
//! ```

use std::iter::FusedIterator;

use super::component::{Component, ComponentMask, ComponentRegistry, ComponentTypeId};
use super::entity::{EntityId, EntitySlot};
use super::world::World;

/// A statically known set of required component types.
///
/// Implemented for `()` (no requirement) and tuples of up to eight
/// component types.
pub trait ComponentSet {
    /// Builds the required mask, or `None` if a member type has never been
    /// registered (no entity can carry it).
    fn mask(registry: &ComponentRegistry) -> Option<ComponentMask>;
}

macro_rules! impl_component_set {
    ($($name:ident),*) => {
        impl<$($name: Component),*> ComponentSet for ($($name,)*) {
            #[allow(unused_variables, unused_mut)]
            fn mask(registry: &ComponentRegistry) -> Option<ComponentMask> {
                let mut mask = ComponentMask::EMPTY;
                $( mask.insert(registry.id_of::<$name>()?); )*
                Some(mask)
            }
        }
    };
}

impl_component_set!();
impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);

/// Collects required component types for a [`RosterView`].
///
/// # Example
///
/// ```rust
/// use roster_core::{Component, World};
///
/// struct Position;
/// impl Component for Position {}
/// struct Shape;
/// impl Component for Shape {}
///
/// let mut world = World::new(16);
/// let e = world.new_entity();
/// world.assign(e, Position);
/// world.assign(e, Shape);
///
/// let matches: Vec<_> = world.query().with::<Position>().with::<Shape>().into_iter().collect();
/// assert_eq!(matches, vec![e]);
/// ```
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct QueryBuilder<'w> {
    world: &'w World,
    required: ComponentMask,
    unsatisfiable: bool,
}

impl<'w> QueryBuilder<'w> {
    pub(crate) fn new(world: &'w World) -> Self {
        Self {
            world,
            required: ComponentMask::EMPTY,
            unsatisfiable: false,
        }
    }

    /// Requires component type `C`.
    ///
    /// If `C` was never assigned in this world the query matches nothing.
    pub fn with<C: Component>(mut self) -> Self {
        match self.world.component_id::<C>() {
            Some(id) => self.required.insert(id),
            None => self.unsatisfiable = true,
        }
        self
    }

    /// Requires the component type registered under `id`.
    ///
    /// Ids unknown to this world make the query match nothing.
    pub fn with_id(mut self, id: ComponentTypeId) -> Self {
        if id.index() < self.world.registry().len() {
            self.required.insert(id);
        } else {
            self.unsatisfiable = true;
        }
        self
    }

    /// Requires every id in `ids`.
    pub fn with_ids<I>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = ComponentTypeId>,
    {
        ids.into_iter().fold(self, QueryBuilder::with_id)
    }

    /// Requires every type in the set `S`.
    pub fn with_set<S: ComponentSet>(mut self) -> Self {
        match S::mask(self.world.registry()) {
            Some(mask) => self.required = self.required.union(mask),
            None => self.unsatisfiable = true,
        }
        self
    }

    /// Returns the mask collected so far.
    #[must_use]
    pub const fn required(&self) -> ComponentMask {
        self.required
    }

    /// Finishes the query, positioned at the first match.
    pub fn build(self) -> RosterView<'w> {
        RosterView::new(self.world.all(), self.required, self.unsatisfiable)
    }
}

impl<'w> IntoIterator for QueryBuilder<'w> {
    type Item = EntityId;
    type IntoIter = RosterView<'w>;

    fn into_iter(self) -> RosterView<'w> {
        self.build()
    }
}

/// Lazy, restartable iterator over live entities matching a mask.
///
/// The view always rests on a matching slot or at the end of the table.
/// Entities are yielded in ascending table index.
#[derive(Clone, Debug)]
#[must_use = "views are lazy and do nothing unless iterated"]
pub struct RosterView<'w> {
    entities: &'w [EntitySlot],
    required: ComponentMask,
    match_all: bool,
    unsatisfiable: bool,
    position: usize,
}

impl<'w> RosterView<'w> {
    fn new(entities: &'w [EntitySlot], required: ComponentMask, unsatisfiable: bool) -> Self {
        let mut view = Self {
            entities,
            required,
            match_all: required.is_empty(),
            unsatisfiable,
            position: 0,
        };
        view.restart();
        view
    }

    /// Rescans from the start of the table.
    pub fn restart(&mut self) {
        self.position = if self.unsatisfiable {
            self.entities.len()
        } else {
            0
        };
        self.seek();
    }

    /// Returns `true` once every match has been yielded.
    #[inline]
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.entities.len()
    }

    /// Returns the entity the view rests on, without advancing.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<EntityId> {
        self.entities.get(self.position).map(|slot| slot.id)
    }

    /// Returns the table index the view rests on.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the required mask.
    #[inline]
    #[must_use]
    pub const fn mask(&self) -> ComponentMask {
        self.required
    }

    #[inline]
    fn matches(&self, slot: &EntitySlot) -> bool {
        slot.is_alive() && (self.match_all || slot.mask.contains_all(self.required))
    }

    /// Skips forward to the next matching slot, or the end.
    #[inline]
    fn seek(&mut self) {
        while let Some(slot) = self.entities.get(self.position) {
            if self.matches(slot) {
                return;
            }
            self.position += 1;
        }
    }
}

impl Iterator for RosterView<'_> {
    type Item = EntityId;

    #[inline]
    fn next(&mut self) -> Option<EntityId> {
        let id = self.current()?;
        self.position += 1;
        self.seek();
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entities.len().saturating_sub(self.position);
        (usize::from(remaining > 0), Some(remaining))
    }
}

impl FusedIterator for RosterView<'_> {}
