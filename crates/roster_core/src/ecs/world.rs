//! # ECS World
//!
//! The central container for entities and their components.
//!
//! The world owns:
//! - The entity table, which grows to the high-water mark of live entities
//! - The free list of recyclable table indices
//! - The component type registry
//! - One fixed-capacity pool per component type, created on first use

use std::any::type_name;

use tracing::{debug, trace, warn};

use super::component::{Component, ComponentMask, ComponentRegistry, ComponentTypeId};
use super::entity::{EntityId, EntitySlot, SENTINEL_INDEX};
use super::query::{ComponentSet, QueryBuilder, RosterView};
use super::storage::{ComponentPool, ErasedPool};
use crate::config::WorldConfig;
use crate::error::{ConfigError, WorldError, WorldResult};

/// The ECS World - container for all entity and component state.
///
/// Entity handles are validated against the table on every access, so a
/// handle to a destroyed entity never reaches another entity's data even
/// after its index has been recycled.
///
/// # Capacity
///
/// The world has a fixed capacity set at creation. Component pools are
/// sized to it up front and never relocate.
///
/// # Example
///
/// ```rust
/// use roster_core::{Component, World};
///
/// struct Position { x: f32 }
/// impl Component for Position {}
///
/// let mut world = World::new(1_000);
/// let entity = world.new_entity();
/// world.assign(entity, Position { x: 1.0 });
///
/// for id in world.view::<(Position,)>() {
///     assert_eq!(id, entity);
/// }
/// ```
pub struct World {
    /// Entity table, indexed by `EntityId::index`.
    entities: Vec<EntitySlot>,
    /// Free list of entity indices for reuse.
    free_indices: Vec<u32>,
    /// Number of currently alive entities.
    alive_count: usize,
    /// Maximum number of live entities, and the size of every pool.
    capacity: usize,
    /// Component type ids for this world.
    registry: ComponentRegistry,
    /// One pool per component id; `None` until the type is first assigned.
    pools: Vec<Option<Box<dyn ErasedPool>>>,
}

impl World {
    /// Creates a new world with the specified entity capacity and the full
    /// component type range.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(
            capacity <= SENTINEL_INDEX as usize,
            "Capacity cannot exceed u32::MAX"
        );
        Self::build(WorldConfig::with_max_entities(capacity))
    }

    /// Creates a world from a validated config.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if the config violates a limit.
    pub fn with_config(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        debug!(
            max_entities = config.max_entities,
            max_component_types = config.max_component_types,
            "creating world"
        );
        Self {
            entities: Vec::new(),
            free_indices: Vec::new(),
            alive_count: 0,
            capacity: config.max_entities,
            registry: ComponentRegistry::new(config.max_component_types),
            pools: Vec::new(),
        }
    }

    /// Returns the maximum number of live entities.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of currently alive entities.
    #[inline]
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Returns the length of the entity table (live and free slots).
    #[inline]
    #[must_use]
    pub fn table_len(&self) -> usize {
        self.entities.len()
    }

    /// Returns the number of indices waiting to be recycled.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_indices.len()
    }

    /// Returns the entity table.
    ///
    /// Free slots are included; check [`EntitySlot::is_alive`].
    #[inline]
    #[must_use]
    pub fn all(&self) -> &[EntitySlot] {
        &self.entities
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Creates an entity, recycling a free index when one is available.
    ///
    /// A recycled index keeps the version stored in its slot, which was
    /// bumped when the previous occupant was destroyed.
    ///
    /// # Errors
    ///
    /// [`WorldError::EntityCapacityExhausted`] if every slot is alive.
    pub fn try_new_entity(&mut self) -> WorldResult<EntityId> {
        if let Some(index) = self.free_indices.pop() {
            let slot = &mut self.entities[index as usize];
            let id = EntityId::new(index, slot.id.version());
            *slot = EntitySlot::new(id);
            self.alive_count += 1;
            trace!(entity = %id, "recycled entity");
            return Ok(id);
        }

        if self.entities.len() >= self.capacity {
            warn!(capacity = self.capacity, "entity capacity exhausted");
            return Err(WorldError::EntityCapacityExhausted {
                capacity: self.capacity,
            });
        }

        #[allow(clippy::cast_possible_truncation)]
        let id = EntityId::new(self.entities.len() as u32, 0);
        self.entities.push(EntitySlot::new(id));
        self.alive_count += 1;
        trace!(entity = %id, "created entity");
        Ok(id)
    }

    /// Creates an entity, returning [`EntityId::INVALID`] if capacity is
    /// exhausted.
    #[inline]
    pub fn new_entity(&mut self) -> EntityId {
        self.try_new_entity().unwrap_or(EntityId::INVALID)
    }

    /// Destroys an entity, dropping its components and freeing its index.
    ///
    /// # Returns
    ///
    /// `true` if the entity was destroyed, `false` if the handle was invalid,
    /// out of range, or stale.
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }

        let index = id.index() as usize;
        let slot = &mut self.entities[index];

        for component in slot.mask {
            if let Some(Some(pool)) = self.pools.get_mut(component.index()) {
                pool.destruct_slot(index);
            }
        }

        // Invalidate the slot; the bumped version is reused on recycle
        slot.mask.clear();
        slot.id = EntityId::new(SENTINEL_INDEX, id.version().wrapping_add(1));
        self.free_indices.push(id.index());
        self.alive_count -= 1;
        trace!(entity = %id, "destroyed entity");

        true
    }

    /// Checks if a handle identifies a live entity.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        id.is_valid()
            && self
                .entities
                .get(id.index() as usize)
                .is_some_and(|slot| slot.id == id)
    }

    // =========================================================================
    // Component registry
    // =========================================================================

    /// Registers `C` ahead of first use, returning its id.
    ///
    /// # Errors
    ///
    /// [`WorldError::ComponentTypeLimit`] if the type limit is reached.
    pub fn register<C: Component>(&mut self) -> WorldResult<ComponentTypeId> {
        self.registry.register::<C>()
    }

    /// Returns the id of `C` if it has been registered.
    #[inline]
    #[must_use]
    pub fn component_id<C: Component>(&self) -> Option<ComponentTypeId> {
        self.registry.id_of::<C>()
    }

    /// Returns the type name registered under `id`.
    #[must_use]
    pub fn component_name(&self, id: ComponentTypeId) -> Option<&'static str> {
        self.registry.name_of(id)
    }

    /// Returns the component registry.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    // =========================================================================
    // Component lifecycle
    // =========================================================================

    /// Attaches `value` to an entity, replacing (and dropping) any previous
    /// component of the same type.
    ///
    /// The pool for `C` is allocated on first use. The mask bit is set only
    /// after the component is in place.
    ///
    /// # Errors
    ///
    /// - [`WorldError::StaleEntity`] if the handle is not alive
    /// - [`WorldError::ComponentTypeLimit`] if `C` is new and the limit is reached
    pub fn try_assign<C: Component>(&mut self, id: EntityId, value: C) -> WorldResult<&mut C> {
        if !self.is_alive(id) {
            return Err(WorldError::StaleEntity(id));
        }

        let component = self.registry.register::<C>()?;
        let index = id.index() as usize;

        if self.pools.len() <= component.index() {
            self.pools.resize_with(component.index() + 1, || None);
        }
        let capacity = self.capacity;
        let pool = self.pools[component.index()].get_or_insert_with(|| {
            debug!(
                component = type_name::<C>(),
                capacity,
                element_size = std::mem::size_of::<C>(),
                "allocating component pool"
            );
            Box::new(ComponentPool::<C>::new(capacity)) as Box<dyn ErasedPool>
        });
        let pool = pool
            .as_any_mut()
            .downcast_mut::<ComponentPool<C>>()
            .ok_or(WorldError::PoolTypeMismatch {
                name: type_name::<C>(),
            })?;

        let value = pool.construct(index, value)?;
        self.entities[index].add_component(component);
        Ok(value)
    }

    /// Attaches `value` to an entity.
    ///
    /// # Returns
    ///
    /// The stored component, or `None` if the handle is stale or the
    /// component type limit is reached.
    #[inline]
    pub fn assign<C: Component>(&mut self, id: EntityId, value: C) -> Option<&mut C> {
        match self.try_assign(id, value) {
            Ok(component) => Some(component),
            Err(err) => {
                debug!(entity = %id, error = %err, "assign rejected");
                None
            }
        }
    }

    /// Attaches a default-constructed `C` to an entity.
    #[inline]
    pub fn assign_default<C: Component + Default>(&mut self, id: EntityId) -> Option<&mut C> {
        self.assign(id, C::default())
    }

    /// Detaches `C` from an entity and returns it.
    ///
    /// Returns `None` (and changes nothing) if the handle is stale or the
    /// component is absent.
    pub fn remove<C: Component>(&mut self, id: EntityId) -> Option<C> {
        if !self.is_alive(id) {
            return None;
        }
        let component = self.registry.id_of::<C>()?;
        let index = id.index() as usize;

        let slot = &mut self.entities[index];
        if !slot.has_component(component) {
            return None;
        }
        slot.remove_component(component);

        self.pools
            .get_mut(component.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<ComponentPool<C>>()?
            .destruct(index)
    }

    /// Gets an entity's component.
    ///
    /// Returns `None` if the handle is stale, `C` was never assigned in this
    /// world, or the entity does not carry `C`.
    #[must_use]
    pub fn get<C: Component>(&self, id: EntityId) -> Option<&C> {
        let (component, index) = self.locate::<C>(id)?;
        self.pools
            .get(component.index())?
            .as_ref()?
            .as_any()
            .downcast_ref::<ComponentPool<C>>()?
            .get(index)
    }

    /// Gets an entity's component mutably.
    pub fn get_mut<C: Component>(&mut self, id: EntityId) -> Option<&mut C> {
        let (component, index) = self.locate::<C>(id)?;
        self.pools
            .get_mut(component.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<ComponentPool<C>>()?
            .get_mut(index)
    }

    /// Checks whether an entity carries `C`.
    #[inline]
    #[must_use]
    pub fn has<C: Component>(&self, id: EntityId) -> bool {
        self.get::<C>(id).is_some()
    }

    /// Returns the pool for `C`, if one has been allocated.
    #[must_use]
    pub fn pool<C: Component>(&self) -> Option<&ComponentPool<C>> {
        let component = self.registry.id_of::<C>()?;
        self.pools
            .get(component.index())?
            .as_ref()?
            .as_any()
            .downcast_ref::<ComponentPool<C>>()
    }

    /// Resolves a live handle carrying `C` to its component id and slot.
    ///
    /// Identity is checked before the mask so a recycled index never leaks
    /// its new occupant's data.
    fn locate<C: Component>(&self, id: EntityId) -> Option<(ComponentTypeId, usize)> {
        if !self.is_alive(id) {
            return None;
        }
        let component = self.registry.id_of::<C>()?;
        let index = id.index() as usize;
        self.entities[index]
            .has_component(component)
            .then_some((component, index))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Starts a query over live entities.
    ///
    /// Add required types with [`QueryBuilder::with`]; with none, every live
    /// entity matches.
    #[inline]
    pub fn query(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(self)
    }

    /// Iterates live entities carrying every type in `S`.
    ///
    /// `S` is `()` or a tuple of component types, e.g. `(Position, Velocity)`.
    pub fn view<S: ComponentSet>(&self) -> RosterView<'_> {
        self.query().with_set::<S>().build()
    }

    /// Visits every live entity carrying `C` and every type in `S`, in table
    /// order, with mutable access to its `C`.
    ///
    /// Returns the number of entities visited.
    pub fn each_mut<S, C, F>(&mut self, mut f: F) -> usize
    where
        S: ComponentSet,
        C: Component,
        F: FnMut(EntityId, &mut C),
    {
        let Some(component) = self.registry.id_of::<C>() else {
            return 0;
        };
        let Some(required) = S::mask(&self.registry) else {
            return 0;
        };
        let required = required.union(ComponentMask::single(component));

        let Some(pool) = self
            .pools
            .get_mut(component.index())
            .and_then(Option::as_mut)
            .and_then(|pool| pool.as_any_mut().downcast_mut::<ComponentPool<C>>())
        else {
            return 0;
        };

        let mut visited = 0;
        for (index, slot) in self.entities.iter().enumerate() {
            if !slot.is_alive() || !slot.mask.contains_all(required) {
                continue;
            }
            if let Some(value) = pool.get_mut(index) {
                f(slot.id, value);
                visited += 1;
            }
        }
        visited
    }
}

impl Default for World {
    fn default() -> Self {
        Self::build(WorldConfig::default())
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("capacity", &self.capacity)
            .field("alive_count", &self.alive_count)
            .field("table_len", &self.entities.len())
            .field("free_count", &self.free_indices.len())
            .field("component_types", &self.registry.len())
            .finish_non_exhaustive()
    }
}
