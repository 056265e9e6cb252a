//! # ECS World
//!
//! The central container for entities and components.
//!
//! Owns one [`EntityRegistry`] and one [`ComponentCatalog`] and forwards
//! the everyday operations to them. Systems receive a `&mut World` on
//! every update.

use super::catalog::ComponentCatalog;
use super::component::{Component, ComponentTypeId, Signature};
use super::entity::{Entity, EntityRegistry};
use crate::config::EcsConfig;
use crate::error::EcsResult;

/// The ECS World - container for all simulation state.
///
/// # Example
///
/// ```rust
/// use lattice_core::World;
///
/// #[derive(Debug, PartialEq)]
/// struct Position(f32, f32);
///
/// let mut world = World::new();
/// world.register_component::<Position>()?;
///
/// let entity = world.create_entity()?;
/// world.add_component(entity, Position(1.0, 2.0))?;
/// assert_eq!(world.get_component::<Position>(entity)?, &Position(1.0, 2.0));
/// # Ok::<(), lattice_core::EcsError>(())
/// ```
#[derive(Default)]
pub struct World {
    entities: EntityRegistry,
    components: ComponentCatalog,
}

impl World {
    /// Creates an empty world with default store limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty world configured from `config`.
    #[must_use]
    pub fn from_config(config: &EcsConfig) -> Self {
        Self {
            entities: EntityRegistry::new(),
            components: ComponentCatalog::from_config(config),
        }
    }

    /// The entity registry.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// The component catalog.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &ComponentCatalog {
        &self.components
    }

    /// The component catalog, mutably.
    #[inline]
    pub fn components_mut(&mut self) -> &mut ComponentCatalog {
        &mut self.components
    }

    /// Creates a fresh entity.
    ///
    /// # Errors
    ///
    /// Propagates [`EntityRegistry::create_entity`] errors.
    #[inline]
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        self.entities.create_entity()
    }

    /// Removes every component of `entity`. The id is not reclaimed.
    ///
    /// Returns how many components were removed.
    pub fn destroy_entity(&mut self, entity: Entity) -> usize {
        self.components.entity_destroyed(entity)
    }

    /// Registers component type `C`.
    ///
    /// # Errors
    ///
    /// Propagates [`ComponentCatalog::register_type`] errors.
    #[inline]
    pub fn register_component<C: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        self.components.register_type::<C>()
    }

    /// Attaches `component` to `entity`.
    ///
    /// # Errors
    ///
    /// Propagates [`ComponentCatalog::add_component`] errors.
    #[inline]
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> EcsResult<()> {
        self.components.add_component(entity, component)
    }

    /// Returns `entity`'s `C`.
    ///
    /// # Errors
    ///
    /// Propagates [`ComponentCatalog::get_component`] errors.
    #[inline]
    pub fn get_component<C: Component>(&self, entity: Entity) -> EcsResult<&C> {
        self.components.get_component(entity)
    }

    /// Returns `entity`'s `C`, mutably.
    ///
    /// # Errors
    ///
    /// Propagates [`ComponentCatalog::get_component_mut`] errors.
    #[inline]
    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> EcsResult<&mut C> {
        self.components.get_component_mut(entity)
    }

    /// Detaches and returns `entity`'s `C`.
    ///
    /// # Errors
    ///
    /// Propagates [`ComponentCatalog::remove_component`] errors.
    #[inline]
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> EcsResult<C> {
        self.components.remove_component(entity)
    }

    /// Checks whether `entity` owns a `C`.
    #[inline]
    #[must_use]
    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        self.components.has_component::<C>(entity)
    }

    /// Current signature of `entity`.
    #[inline]
    #[must_use]
    pub fn signature(&self, entity: Entity) -> Signature {
        self.components.signature(entity)
    }

    /// Entities owning every component in `required`, ascending.
    pub fn query(&self, required: Signature) -> impl Iterator<Item = Entity> + '_ {
        self.components.entities_matching(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::storage::StoreLimits;
    use crate::error::EcsError;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        x: f32,
        y: f32,
    }

    #[test]
    fn test_world_creation() {
        let world = World::new();
        assert_eq!(world.entities().issued(), 0);
        assert_eq!(world.components().registered_types(), 0);
    }

    #[test]
    fn test_position_update() {
        let mut world = World::new();
        world.register_component::<Position>().unwrap();
        world.register_component::<Velocity>().unwrap();

        let id = world.create_entity().unwrap();
        world.add_component(id, Position { x: 0.0, y: 0.0 }).unwrap();
        world.add_component(id, Velocity { x: 1.0, y: 2.0 }).unwrap();

        let velocity = *world.get_component::<Velocity>(id).unwrap();
        let position = world.get_component_mut::<Position>(id).unwrap();
        position.x += velocity.x;
        position.y += velocity.y;

        let pos = world.get_component::<Position>(id).unwrap();
        assert!((pos.x - 1.0).abs() < f32::EPSILON);
        assert!((pos.y - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_destroy_entity() {
        let mut world = World::new();
        world.register_component::<Position>().unwrap();
        world.register_component::<Velocity>().unwrap();

        let a = world.create_entity().unwrap();
        let b = world.create_entity().unwrap();
        world.add_component(a, Position { x: 1.0, y: 1.0 }).unwrap();
        world.add_component(a, Velocity { x: 1.0, y: 1.0 }).unwrap();
        world.add_component(b, Position { x: 2.0, y: 2.0 }).unwrap();

        assert_eq!(world.destroy_entity(a), 2);
        assert!(!world.has_component::<Position>(a));
        assert!(matches!(
            world.get_component::<Velocity>(a),
            Err(EcsError::ComponentNotFound { .. })
        ));
        assert!(world.has_component::<Position>(b));

        // Ids are never reused.
        let c = world.create_entity().unwrap();
        assert!(c > b);
    }

    #[test]
    fn test_query() {
        let mut world = World::new();
        let pos = world.register_component::<Position>().unwrap();
        let vel = world.register_component::<Velocity>().unwrap();

        let still = world.create_entity().unwrap();
        let moving = world.create_entity().unwrap();
        world.add_component(still, Position { x: 0.0, y: 0.0 }).unwrap();
        world.add_component(moving, Position { x: 0.0, y: 0.0 }).unwrap();
        world.add_component(moving, Velocity { x: 1.0, y: 0.0 }).unwrap();

        let required = Signature::empty().with(pos).with(vel);
        assert_eq!(world.query(required).collect::<Vec<_>>(), vec![moving]);
        assert_eq!(world.signature(moving), required);
    }

    #[test]
    fn test_from_config_applies_limits() {
        let config = EcsConfig {
            stores: StoreLimits::bounded(1),
        };
        let mut world = World::from_config(&config);
        world.register_component::<Position>().unwrap();

        let a = world.create_entity().unwrap();
        let b = world.create_entity().unwrap();
        world.add_component(a, Position { x: 0.0, y: 0.0 }).unwrap();
        assert!(matches!(
            world.add_component(b, Position { x: 0.0, y: 0.0 }),
            Err(EcsError::CapacityExceeded { capacity: 1, .. })
        ));
    }
}
