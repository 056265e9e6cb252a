//! # ECS Storage Properties
//!
//! End-to-end checks of the storage and query engine through the public API:
//!
//! 1. **Component Store**: density, round-trip, swap-remove, capacity
//! 2. **Component Catalog**: signature stability, isolation across types
//! 3. **System Registry**: update order and delta time
//!
//! Run with: cargo test -p lattice_core --test ecs_properties

use std::cell::RefCell;
use std::rc::Rc;

use lattice_core::{
    ComponentCatalog, ComponentStore, EcsError, Entity, EntityRegistry, Signature, StoreLimits,
    System, SystemRegistry, World,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Health(u32);

fn spawn(registry: &mut EntityRegistry, count: usize) -> Vec<Entity> {
    (0..count)
        .map(|_| registry.create_entity().expect("fresh registry"))
        .collect()
}

fn assert_dense<C: 'static>(store: &ComponentStore<C>) {
    assert_eq!(store.as_slice().len(), store.len());
    assert_eq!(store.entities().len(), store.len());
    for index in 0..store.len() {
        let owner = store.entity_at(index).expect("slot must be occupied");
        assert_eq!(store.index_of(owner), Some(index), "slot {index} maps back");
    }
    assert_eq!(store.entity_at(store.len()), None);
}

// ============================================================================
// COMPONENT STORE
// ============================================================================

#[test]
fn density_holds_across_mixed_inserts_and_removes() {
    let mut registry = EntityRegistry::new();
    let entities = spawn(&mut registry, 64);
    let mut store = ComponentStore::new(StoreLimits::bounded(64));

    for (n, &entity) in entities.iter().enumerate() {
        store.insert(entity, Health(u32::try_from(n).unwrap())).unwrap();
    }
    assert_dense(&store);

    // Remove every third entity, front to back.
    for &entity in entities.iter().step_by(3) {
        store.remove(entity).unwrap();
        assert_dense(&store);
    }
    // Re-add a few and remove from the back.
    for &entity in entities.iter().step_by(6) {
        store.insert(entity, Health(999)).unwrap();
    }
    for &entity in entities.iter().rev().take(10) {
        if store.contains(entity) {
            store.remove(entity).unwrap();
        }
    }
    assert_dense(&store);

    // Every surviving entity still maps to its own value.
    for (owner, health) in store.iter() {
        let original = u32::try_from(owner.id()).unwrap();
        assert!(health.0 == original || health.0 == 999);
    }
}

#[test]
fn insert_then_get_round_trips() {
    let mut store = ComponentStore::new(StoreLimits::default());
    let entity = Entity::from_raw(42);
    let value = Position { x: -3.5, y: 8.25 };

    store.insert(entity, value).unwrap();
    let stored = store.get(entity).unwrap();
    assert_eq!(*stored, value);
    assert!((stored.x + 3.5).abs() < f32::EPSILON);
    assert!((stored.y - 8.25).abs() < f32::EPSILON);
}

#[test]
fn removing_middle_entity_keeps_the_rest() {
    let mut registry = EntityRegistry::new();
    let e = spawn(&mut registry, 5);
    let mut store = ComponentStore::new(StoreLimits::default());
    for (n, &entity) in e.iter().enumerate() {
        store.insert(entity, Health(100 + u32::try_from(n).unwrap())).unwrap();
    }

    let before = store.len();
    assert_eq!(store.remove(e[2]), Ok(Health(102)));
    assert_eq!(store.len(), before - 1);

    assert_eq!(store.get(e[0]), Ok(&Health(100)));
    assert_eq!(store.get(e[1]), Ok(&Health(101)));
    assert_eq!(store.get(e[3]), Ok(&Health(103)));
    assert_eq!(store.get(e[4]), Ok(&Health(104)));
    assert!(matches!(
        store.get(e[2]),
        Err(EcsError::ComponentNotFound { entity, .. }) if entity == e[2]
    ));
    assert_dense(&store);
}

#[test]
fn removing_last_entity_moves_nothing() {
    let mut registry = EntityRegistry::new();
    let e = spawn(&mut registry, 4);
    let mut store = ComponentStore::new(StoreLimits::default());
    for &entity in &e {
        store.insert(entity, Health(entity.id())).unwrap();
    }
    let layout_before: Vec<_> = store.iter().map(|(owner, h)| (owner, *h)).collect();

    store.remove(e[3]).unwrap();

    let layout_after: Vec<_> = store.iter().map(|(owner, h)| (owner, *h)).collect();
    assert_eq!(layout_after, layout_before[..3]);
}

#[test]
fn removing_non_last_relocates_exactly_one() {
    let mut registry = EntityRegistry::new();
    let e = spawn(&mut registry, 5);
    let mut store = ComponentStore::new(StoreLimits::default());
    for &entity in &e {
        store.insert(entity, Health(entity.id())).unwrap();
    }
    let index_before: Vec<_> = e.iter().map(|&entity| store.index_of(entity)).collect();

    store.remove(e[1]).unwrap();

    // The previous last element now occupies the freed slot.
    assert_eq!(store.index_of(e[4]), Some(1));
    assert_eq!(store.entity_at(1), Some(e[4]));
    assert_eq!(store.get(e[4]), Ok(&Health(e[4].id())));

    // Everything else kept its slot.
    for n in [0, 2, 3] {
        assert_eq!(store.index_of(e[n]), index_before[n]);
    }
    assert_eq!(store.index_of(e[1]), None);
    assert_dense(&store);
}

#[test]
fn capacity_boundary_is_an_error() {
    let mut registry = EntityRegistry::new();
    let e = spawn(&mut registry, 4);
    let mut store = ComponentStore::new(StoreLimits::bounded(3));

    for &entity in &e[..3] {
        store.insert(entity, Health(1)).unwrap();
    }
    assert!(matches!(
        store.insert(e[3], Health(1)),
        Err(EcsError::CapacityExceeded { capacity: 3, .. })
    ));
    assert_eq!(store.len(), 3);
    assert!(!store.contains(e[3]));
    assert_dense(&store);
}

#[test]
fn duplicate_insert_is_rejected() {
    let mut store = ComponentStore::new(StoreLimits::default());
    let entity = Entity::from_raw(1);
    store.insert(entity, Health(5)).unwrap();

    assert!(matches!(
        store.insert(entity, Health(6)),
        Err(EcsError::DuplicateComponent { .. })
    ));
    assert_eq!(store.get(entity), Ok(&Health(5)));
}

// ============================================================================
// COMPONENT CATALOG
// ============================================================================

#[test]
fn signature_bits_are_stable() {
    let mut catalog = ComponentCatalog::new();
    let a = catalog.register_type::<Position>().unwrap();
    let b = catalog.register_type::<Health>().unwrap();

    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(catalog.register_type::<Position>().unwrap().index(), 0);
    assert_eq!(catalog.component_type::<Health>().unwrap().index(), 1);
}

#[test]
fn operations_on_one_type_leave_others_alone() {
    let mut catalog = ComponentCatalog::new();
    catalog.register_type::<Position>().unwrap();
    catalog.register_type::<Health>().unwrap();
    let entity = Entity::from_raw(3);

    catalog.add_component(entity, Health(77)).unwrap();
    catalog.add_component(entity, Position { x: 1.0, y: 1.0 }).unwrap();
    catalog.remove_component::<Position>(entity).unwrap();
    catalog.add_component(entity, Position { x: 2.0, y: 2.0 }).unwrap();
    catalog.remove_component::<Position>(entity).unwrap();

    assert_eq!(catalog.get_component::<Health>(entity), Ok(&Health(77)));
    assert!(catalog.has_component::<Health>(entity));
    assert!(!catalog.has_component::<Position>(entity));
    assert_eq!(catalog.signature(entity), catalog.signature_of::<Health>().unwrap());
}

#[test]
fn unregistered_type_is_a_lookup_error() {
    let catalog = ComponentCatalog::new();
    assert!(matches!(
        catalog.get_component::<Health>(Entity::from_raw(0)),
        Err(EcsError::UnregisteredComponent { .. })
    ));
    assert!(matches!(
        catalog.store::<Health>(),
        Err(EcsError::UnregisteredComponent { .. })
    ));
}

#[test]
fn query_selects_entities_by_signature() {
    let mut world = World::new();
    world.register_component::<Position>().unwrap();
    world.register_component::<Health>().unwrap();

    let mut expected = Vec::new();
    for n in 0..10_u32 {
        let entity = world.create_entity().unwrap();
        world.add_component(entity, Health(n)).unwrap();
        if n % 3 == 0 {
            world
                .add_component(entity, Position { x: 0.0, y: 0.0 })
                .unwrap();
            expected.push(entity);
        }
    }

    let both = world.components().signature_of::<Position>().unwrap()
        | world.components().signature_of::<Health>().unwrap();
    assert_eq!(world.query(both).collect::<Vec<_>>(), expected);
    assert_eq!(world.query(Signature::empty()).count(), 10);
}

// ============================================================================
// SYSTEM REGISTRY
// ============================================================================

type CallLog = Rc<RefCell<Vec<(&'static str, f64)>>>;

struct Probe {
    label: &'static str,
    calls: CallLog,
}

impl System for Probe {
    fn name(&self) -> &str {
        self.label
    }

    fn update(&mut self, _world: &mut World, delta_time: f64) {
        self.calls.borrow_mut().push((self.label, delta_time));
    }
}

#[derive(Default)]
struct Regen {
    amount: u32,
}

impl System for Regen {
    fn update(&mut self, world: &mut World, _delta_time: f64) {
        let Ok(mut store) = world.components_mut().store_mut::<Health>() else {
            return;
        };
        for health in store.as_mut_slice() {
            health.0 += self.amount;
        }
    }
}

#[test]
fn systems_run_once_each_in_registration_order() {
    let calls: CallLog = Rc::default();
    let mut systems = SystemRegistry::new();
    for label in ["S1", "S2", "S3"] {
        systems.add_system(Probe {
            label,
            calls: Rc::clone(&calls),
        });
    }

    let mut world = World::new();
    systems.update_all(&mut world, 0.016);

    assert_eq!(
        *calls.borrow(),
        vec![("S1", 0.016), ("S2", 0.016), ("S3", 0.016)]
    );
}

#[test]
fn systems_mutate_components_through_the_world() {
    let mut world = World::new();
    world.register_component::<Health>().unwrap();
    let a = world.create_entity().unwrap();
    let b = world.create_entity().unwrap();
    world.add_component(a, Health(10)).unwrap();
    world.add_component(b, Health(20)).unwrap();

    let mut systems = SystemRegistry::new();
    let regen = systems.register_system::<Regen>();
    systems.get_mut(regen).expect("registered above").amount = 5;

    for _ in 0..3 {
        systems.update_all(&mut world, 1.0 / 60.0);
    }

    assert_eq!(world.get_component::<Health>(a), Ok(&Health(25)));
    assert_eq!(world.get_component::<Health>(b), Ok(&Health(35)));
}
