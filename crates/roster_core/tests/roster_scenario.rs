//! # Roster Scenario Tests
//!
//! End-to-end checks of the public contract: recycling, isolation, mask
//! exactness, detach semantics and the universal query.
//!
//! Run with: cargo test --package roster_core --test roster_scenario

use roster_core::{Component, EntityId, World, WorldConfig, WorldError};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Vector {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Quaternion {
    x: f32,
    y: f32,
    z: f32,
    w: f32,
}

/// Sample payload: the default is all zeroes, `uniform(v)` sets the position.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transform {
    position: Vector,
    rotation: Quaternion,
    scale: Vector,
}

impl Transform {
    fn uniform(v: f32) -> Self {
        Self {
            position: Vector { x: v, y: v, z: v },
            ..Self::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        let zero = Vector { x: 0.0, y: 0.0, z: 0.0 };
        Self {
            position: zero,
            rotation: Quaternion { x: 0.0, y: 0.0, z: 0.0, w: 0.0 },
            scale: zero,
        }
    }
}

impl Component for Transform {}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Shape {
    shape: bool,
}
impl Component for Shape {}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Renderable {
    renderable: bool,
}
impl Component for Renderable {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct P {
    x: i32,
}
impl Component for P {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct M;
impl Component for M {}

fn small_world() -> World {
    World::with_config(WorldConfig::with_max_entities(64)).unwrap()
}

// ============================================================================
// SEED SCENARIO
// ============================================================================

#[test]
fn scenario_query_destroy_remove() {
    let mut world = small_world();

    let e1 = world.new_entity();
    let e2 = world.new_entity();
    let e3 = world.new_entity();

    world.assign(e1, P { x: 1 });
    world.assign(e2, P { x: 2 });
    world.assign(e3, P { x: 3 });
    world.assign(e2, M);
    world.assign(e3, M);

    let matched: Vec<EntityId> = world.view::<(P, M)>().collect();
    assert_eq!(matched, vec![e2, e3]);

    let xs: Vec<i32> = matched
        .iter()
        .map(|&id| world.get::<P>(id).unwrap().x)
        .collect();
    assert_eq!(xs, vec![2, 3]);

    assert!(world.destroy_entity(e2));
    assert_eq!(world.remove::<P>(e3), Some(P { x: 3 }));

    let matched: Vec<EntityId> = world.view::<(P,)>().collect();
    assert_eq!(matched, vec![e1]);
}

#[test]
fn scenario_transform_shape_renderable() {
    let mut world = small_world();

    let e1 = world.new_entity();
    world.assign(e1, Transform::uniform(1.0));

    let e2 = world.new_entity();
    world.assign(e2, Transform::uniform(2.0));
    world.assign_default::<Shape>(e2);

    let e3 = world.new_entity();
    world.assign(e3, Transform::uniform(3.0));
    world.assign_default::<Shape>(e3);
    world.assign_default::<Renderable>(e3);

    let mut seen = Vec::new();
    let visited = world.each_mut::<(Shape,), Transform, _>(|_, transform| {
        seen.push(transform.position.x);
        transform.position.x = 10.0;
    });
    assert_eq!(visited, 2);
    assert_eq!(seen, vec![2.0, 3.0]);

    let xs: Vec<f32> = world
        .view::<(Transform,)>()
        .map(|id| world.get::<Transform>(id).unwrap().position.x)
        .collect();
    assert_eq!(xs, vec![1.0, 10.0, 10.0]);

    assert!(world.has::<Transform>(e1));
    assert_eq!(world.get::<Transform>(e1).unwrap().scale.x, 0.0);

    world.destroy_entity(e2);
    world.remove::<Transform>(e3);

    let remaining: Vec<EntityId> = world.view::<(Transform,)>().collect();
    assert_eq!(remaining, vec![e1]);
    assert_eq!(world.view::<(Shape, Renderable)>().collect::<Vec<_>>(), vec![e3]);
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn recycling_bumps_version_and_hides_old_components() {
    let mut world = small_world();
    let e = world.new_entity();
    world.assign(e, P { x: 42 });

    assert!(world.destroy_entity(e));
    let recycled = world.new_entity();

    assert_eq!(recycled.index(), e.index());
    assert_eq!(recycled.version(), e.version() + 1);
    assert!(world.get::<P>(e).is_none());
    assert!(world.get::<P>(recycled).is_none());
    assert!(!world.is_alive(e));

    // Second round trip keeps counting
    world.destroy_entity(recycled);
    let again = world.new_entity();
    assert_eq!(again.version(), e.version() + 2);
}

#[test]
fn table_grows_to_high_water_mark_only() {
    let mut world = small_world();
    for _ in 0..10 {
        let batch: Vec<_> = (0..5).map(|_| world.new_entity()).collect();
        for id in batch {
            world.destroy_entity(id);
        }
    }
    assert_eq!(world.table_len(), 5);
    assert_eq!(world.alive_count(), 0);
}

#[test]
fn assignment_is_isolated_between_entities() {
    let mut world = small_world();
    let a = world.new_entity();
    let b = world.new_entity();
    world.assign(b, P { x: 7 });

    world.assign(a, P { x: 1 });
    world.get_mut::<P>(a).unwrap().x = 100;

    assert_eq!(world.get::<P>(b), Some(&P { x: 7 }));
    assert_eq!(world.get::<P>(a), Some(&P { x: 100 }));
}

#[test]
fn detach_then_reassign() {
    let mut world = small_world();
    let e = world.new_entity();
    world.assign(e, Transform::uniform(5.0));

    world.remove::<Transform>(e);
    assert!(!world.has::<Transform>(e));

    let fresh = world.assign_default::<Transform>(e).unwrap();
    assert_eq!(*fresh, Transform::default());
    assert!(world.has::<Transform>(e));
}

#[test]
fn universal_query_skips_only_dead_slots() {
    let mut world = small_world();
    let ids: Vec<_> = (0..6).map(|_| world.new_entity()).collect();
    world.assign(ids[0], M);
    world.destroy_entity(ids[2]);
    world.destroy_entity(ids[4]);

    let all: Vec<_> = world.view::<()>().collect();
    assert_eq!(all, vec![ids[0], ids[1], ids[3], ids[5]]);
    assert_eq!(world.query().into_iter().count(), 4);
}

#[test]
fn invalid_handle_is_inert() {
    let mut world = small_world();
    world.new_entity();

    assert!(!world.is_alive(EntityId::INVALID));
    assert!(world.assign(EntityId::INVALID, M).is_none());
    assert!(world.get::<M>(EntityId::INVALID).is_none());
    assert!(!world.destroy_entity(EntityId::INVALID));
    assert_eq!(
        world.try_assign(EntityId::INVALID, M).unwrap_err(),
        WorldError::StaleEntity(EntityId::INVALID)
    );
}

#[test]
fn capacity_is_a_hard_limit() {
    let mut world = World::with_config(WorldConfig::with_max_entities(3)).unwrap();
    let ids: Vec<_> = (0..3).map(|_| world.new_entity()).collect();
    assert!(ids.iter().all(|id| id.is_valid()));

    assert_eq!(
        world.try_new_entity().unwrap_err(),
        WorldError::EntityCapacityExhausted { capacity: 3 }
    );
    assert_eq!(world.pool::<P>().map(|p| p.capacity()), None);

    world.assign(ids[0], P { x: 0 });
    assert_eq!(world.pool::<P>().map(|p| p.capacity()), Some(3));
}

#[test]
fn worlds_do_not_share_type_ids() {
    let mut first = small_world();
    let mut second = small_world();

    let a = first.new_entity();
    first.assign(a, P { x: 1 });
    first.assign(a, M);

    let b = second.new_entity();
    second.assign(b, M);

    assert_eq!(first.component_id::<M>().map(|id| id.index()), Some(1));
    assert_eq!(second.component_id::<M>().map(|id| id.index()), Some(0));
    assert_eq!(second.view::<(P,)>().count(), 0);
}

#[test]
fn config_loaded_from_toml() {
    let config = WorldConfig::from_toml_str(
        r"
        max_entities = 8
        max_component_types = 2
        ",
    )
    .unwrap();
    let mut world = World::with_config(config).unwrap();
    let e = world.new_entity();

    world.assign(e, P { x: 1 });
    world.assign(e, M);
    assert_eq!(
        world.try_assign(e, Shape::default()).unwrap_err(),
        WorldError::ComponentTypeLimit { limit: 2 }
    );
}
