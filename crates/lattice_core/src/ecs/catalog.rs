//! # Component Catalog
//!
//! Type-erased registry routing typed component operations to the right
//! [`ComponentStore`].
//!
//! ## Layout
//!
//! ```text
//! TypeId(Position) ──► { bit 0, Box<dyn ErasedStore> = ComponentStore<Position> }
//! TypeId(Velocity) ──► { bit 1, Box<dyn ErasedStore> = ComponentStore<Velocity> }
//!
//! signatures: e0 ──► 0b11, e1 ──► 0b01, ...
//! ```
//!
//! Stores are keyed by [`TypeId`] and recovered with a checked downcast.
//! Bits are handed out in registration order, first registration wins.

use std::any::{type_name, TypeId};
use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::component::{Component, ComponentTypeId, Signature, MAX_COMPONENT_TYPES};
use super::entity::Entity;
use super::storage::{ComponentStore, ErasedStore, StoreLimits, StoreViewMut};
use crate::config::EcsConfig;
use crate::error::{EcsError, EcsResult};

/// A registered component type.
struct Registration {
    /// Signature bit.
    id: ComponentTypeId,
    /// The type's store.
    store: Box<dyn ErasedStore>,
}

/// Registry of component types and their stores.
///
/// Also tracks the [`Signature`] of every entity that owns at least one
/// component, kept in step with every add and remove.
pub struct ComponentCatalog {
    /// Registered types.
    types: HashMap<TypeId, Registration>,
    /// Signature of each entity owning at least one component.
    signatures: BTreeMap<Entity, Signature>,
    /// Next bit to hand out.
    next_id: usize,
    /// Limits applied to stores created by [`register_type`](Self::register_type).
    default_limits: StoreLimits,
}

impl ComponentCatalog {
    /// Creates an empty catalog with default store limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(StoreLimits::default())
    }

    /// Creates an empty catalog whose stores use `limits`.
    #[must_use]
    pub fn with_limits(limits: StoreLimits) -> Self {
        debug!(
            max_components = limits.max_components,
            reserve = limits.reserve,
            "component catalog created"
        );
        Self {
            types: HashMap::new(),
            signatures: BTreeMap::new(),
            next_id: 0,
            default_limits: limits,
        }
    }

    /// Creates an empty catalog configured from `config`.
    #[must_use]
    pub fn from_config(config: &EcsConfig) -> Self {
        Self::with_limits(config.stores)
    }

    /// Number of registered component types.
    #[inline]
    #[must_use]
    pub fn registered_types(&self) -> usize {
        self.types.len()
    }

    /// Registers `C` with the default store limits.
    ///
    /// Idempotent: registering a known type returns its existing bit and
    /// keeps its store and components.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::TooManyComponentTypes`] when all signature bits
    /// are taken.
    pub fn register_type<C: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        self.register_type_with_limits::<C>(self.default_limits)
    }

    /// Registers `C` with its own store limits.
    ///
    /// If `C` is already registered the limits are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::TooManyComponentTypes`] when all signature bits
    /// are taken.
    pub fn register_type_with_limits<C: Component>(
        &mut self,
        limits: StoreLimits,
    ) -> EcsResult<ComponentTypeId> {
        if let Some(registration) = self.types.get(&TypeId::of::<C>()) {
            return Ok(registration.id);
        }

        let id = ComponentTypeId::new(self.next_id).ok_or(EcsError::TooManyComponentTypes {
            max: MAX_COMPONENT_TYPES,
        })?;
        self.next_id += 1;

        debug!(
            component = type_name::<C>(),
            bit = id.index(),
            max_components = limits.max_components,
            "registered component type"
        );

        self.types.insert(
            TypeId::of::<C>(),
            Registration {
                id,
                store: Box::new(ComponentStore::<C>::new(limits)),
            },
        );
        Ok(id)
    }

    /// Checks whether `C` has been registered.
    #[inline]
    #[must_use]
    pub fn is_registered<C: Component>(&self) -> bool {
        self.types.contains_key(&TypeId::of::<C>())
    }

    /// Signature bit assigned to `C`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] if `C` is unknown.
    pub fn component_type<C: Component>(&self) -> EcsResult<ComponentTypeId> {
        self.registration::<C>().map(|registration| registration.id)
    }

    /// Signature with only `C`'s bit set.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] if `C` is unknown.
    pub fn signature_of<C: Component>(&self) -> EcsResult<Signature> {
        self.component_type::<C>()
            .map(|id| Signature::empty().with(id))
    }

    /// Current signature of `entity`. Empty if it owns nothing.
    #[inline]
    #[must_use]
    pub fn signature(&self, entity: Entity) -> Signature {
        self.signatures.get(&entity).copied().unwrap_or_default()
    }

    /// Attaches `component` to `entity`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredComponent`] if `C` is unknown
    /// - [`EcsError::DuplicateComponent`] if `entity` already has a `C`
    /// - [`EcsError::CapacityExceeded`] if `C`'s store is full
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> EcsResult<()> {
        let id = self.component_type::<C>()?;
        self.typed_store_mut::<C>()?.insert(entity, component)?;
        self.signatures.entry(entity).or_default().set(id);
        Ok(())
    }

    /// Returns `entity`'s `C`.
    ///
    /// The reference borrows the catalog: no component can be added or
    /// removed while it is alive.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredComponent`] if `C` is unknown
    /// - [`EcsError::ComponentNotFound`] if `entity` has no `C`
    pub fn get_component<C: Component>(&self, entity: Entity) -> EcsResult<&C> {
        self.store::<C>()?.get(entity)
    }

    /// Returns `entity`'s `C`, mutably.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredComponent`] if `C` is unknown
    /// - [`EcsError::ComponentNotFound`] if `entity` has no `C`
    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> EcsResult<&mut C> {
        self.typed_store_mut::<C>()?.get_mut(entity)
    }

    /// Detaches and returns `entity`'s `C`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredComponent`] if `C` is unknown
    /// - [`EcsError::ComponentNotFound`] if `entity` has no `C`
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> EcsResult<C> {
        let id = self.component_type::<C>()?;
        let removed = self.typed_store_mut::<C>()?.remove(entity)?;
        self.clear_bit(entity, id);
        Ok(removed)
    }

    /// Checks whether `entity` owns a `C`. False for unregistered types.
    #[must_use]
    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        self.component_type::<C>()
            .is_ok_and(|id| self.signature(entity).contains(id))
    }

    /// Removes every component `entity` owns, across all stores.
    ///
    /// Returns how many components were removed.
    pub fn entity_destroyed(&mut self, entity: Entity) -> usize {
        let Some(signature) = self.signatures.remove(&entity) else {
            return 0;
        };

        let mut removed = 0;
        for registration in self.types.values_mut() {
            if signature.contains(registration.id) && registration.store.remove_entity(entity) {
                removed += 1;
            }
        }

        debug!(%entity, removed, "entity components dropped");
        removed
    }

    /// Entities owning every component in `required`, in ascending order.
    ///
    /// An empty `required` matches every entity that owns at least one
    /// component.
    pub fn entities_matching(&self, required: Signature) -> impl Iterator<Item = Entity> + '_ {
        self.signatures
            .iter()
            .filter(move |(_, signature)| signature.contains_all(required))
            .map(|(entity, _)| *entity)
    }

    /// Typed access to `C`'s store.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] if `C` is unknown.
    pub fn store<C: Component>(&self) -> EcsResult<&ComponentStore<C>> {
        self.registration::<C>()?
            .store
            .as_store_any()
            .downcast_ref::<ComponentStore<C>>()
            .ok_or_else(unregistered::<C>)
    }

    /// Mutable access to `C`'s values, in dense order.
    ///
    /// The view edits components in place but cannot insert, remove or
    /// clear. Those go through [`add_component`](Self::add_component) and
    /// [`remove_component`](Self::remove_component) so signatures stay in step.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] if `C` is unknown.
    pub fn store_mut<C: Component>(&mut self) -> EcsResult<StoreViewMut<'_, C>> {
        self.typed_store_mut::<C>().map(StoreViewMut::new)
    }

    fn typed_store_mut<C: Component>(&mut self) -> EcsResult<&mut ComponentStore<C>> {
        self.types
            .get_mut(&TypeId::of::<C>())
            .ok_or_else(unregistered::<C>)?
            .store
            .as_store_any_mut()
            .downcast_mut::<ComponentStore<C>>()
            .ok_or_else(unregistered::<C>)
    }

    fn registration<C: Component>(&self) -> EcsResult<&Registration> {
        self.types
            .get(&TypeId::of::<C>())
            .ok_or_else(unregistered::<C>)
    }

    fn clear_bit(&mut self, entity: Entity, id: ComponentTypeId) {
        if let Some(signature) = self.signatures.get_mut(&entity) {
            signature.clear(id);
            if signature.is_empty() {
                self.signatures.remove(&entity);
            }
        }
    }
}

impl Default for ComponentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn unregistered<C: Component>() -> EcsError {
    EcsError::UnregisteredComponent {
        component: type_name::<C>(),
    }
}
