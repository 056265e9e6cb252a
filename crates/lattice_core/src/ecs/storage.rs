//! # Component Storage
//!
//! Dense, per-type component storage with O(1) insert, lookup and removal.
//!
//! The storage keeps three structures in lockstep:
//! - `dense`: the component values, contiguous, no holes
//! - `entities`: dense index -> owning entity
//! - `indices`: owning entity -> dense index
//!
//! Removal swaps the removed slot with the last slot and shrinks by one.
//! This keeps iteration cache-friendly but does NOT preserve insertion order.
//!
//! ```text
//! remove(e1):
//!   dense:    [A(e0), B(e1), C(e2), D(e3)]
//!   swap:     [A(e0), D(e3), C(e2)]          <- D moved into slot 1
//!   indices:  e3 -> 1, e1 -> (erased)
//! ```

use std::any::{type_name, Any};
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::component::Component;
use super::entity::Entity;
use crate::error::{EcsError, EcsResult};

/// Size policy for a single component store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreLimits {
    /// Maximum number of live components of one type.
    pub max_components: usize,
    /// Slots allocated up front when the store is created.
    pub reserve: usize,
}

impl StoreLimits {
    /// Default maximum number of components per type.
    pub const DEFAULT_MAX_COMPONENTS: usize = 1000;

    /// Creates limits with the given maximum and no pre-allocation.
    #[inline]
    #[must_use]
    pub const fn bounded(max_components: usize) -> Self {
        Self {
            max_components,
            reserve: 0,
        }
    }

    /// Sets the number of slots allocated up front.
    #[inline]
    #[must_use]
    pub const fn with_reserve(mut self, reserve: usize) -> Self {
        self.reserve = reserve;
        self
    }
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self::bounded(Self::DEFAULT_MAX_COMPONENTS)
    }
}

/// Dense storage for a single component type.
///
/// References returned by [`get`](Self::get) borrow the store, so the
/// borrow checker rejects any insert or remove while one is alive.
///
/// # Example
///
/// ```rust
/// use lattice_core::{ComponentStore, Entity, StoreLimits};
///
/// let mut store: ComponentStore<f32> = ComponentStore::new(StoreLimits::bounded(16));
/// store.insert(Entity::from_raw(3), 1.5).unwrap();
/// assert_eq!(store.get(Entity::from_raw(3)), Ok(&1.5));
/// ```
pub struct ComponentStore<C: Component> {
    /// The dense array of components.
    dense: Vec<C>,
    /// Owner of each dense slot.
    entities: Vec<Entity>,
    /// Dense slot of each owner.
    indices: HashMap<Entity, usize>,
    /// Size policy.
    limits: StoreLimits,
}

impl<C: Component> ComponentStore<C> {
    /// Creates an empty store.
    ///
    /// `limits.reserve` slots are allocated up front (capped at
    /// `limits.max_components`).
    #[must_use]
    pub fn new(limits: StoreLimits) -> Self {
        if limits.reserve > limits.max_components {
            warn!(
                component = type_name::<C>(),
                reserve = limits.reserve,
                max_components = limits.max_components,
                "reserve exceeds store capacity, capping"
            );
        }
        let reserve = limits.reserve.min(limits.max_components);
        Self {
            dense: Vec::with_capacity(reserve),
            entities: Vec::with_capacity(reserve),
            indices: HashMap::with_capacity(reserve),
            limits,
        }
    }

    /// Maximum number of live components this store accepts.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.limits.max_components
    }

    /// Number of live components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Checks if the store holds no components.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Checks if `entity` owns a component in this store.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.indices.contains_key(&entity)
    }

    /// Attaches `component` to `entity`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DuplicateComponent`] if `entity` already has one
    /// - [`EcsError::CapacityExceeded`] if the store is full
    pub fn insert(&mut self, entity: Entity, component: C) -> EcsResult<()> {
        if self.indices.contains_key(&entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: type_name::<C>(),
            });
        }
        if self.dense.len() >= self.limits.max_components {
            return Err(EcsError::CapacityExceeded {
                component: type_name::<C>(),
                capacity: self.limits.max_components,
            });
        }

        let index = self.dense.len();
        self.dense.push(component);
        self.entities.push(entity);
        self.indices.insert(entity, index);
        Ok(())
    }

    /// Detaches and returns the component owned by `entity`.
    ///
    /// The last component is moved into the freed slot, so exactly one
    /// element relocates (none if `entity` owned the last slot).
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotFound`] if `entity` has no component here.
    pub fn remove(&mut self, entity: Entity) -> EcsResult<C> {
        let index = self
            .indices
            .remove(&entity)
            .ok_or_else(|| Self::not_found(entity))?;

        let removed = self.dense.swap_remove(index);
        self.entities.swap_remove(index);

        // Re-point the element that moved from the old last slot.
        if let Some(&moved) = self.entities.get(index) {
            self.indices.insert(moved, index);
        }

        Ok(removed)
    }

    /// Returns the component owned by `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotFound`] if `entity` has no component here.
    #[inline]
    pub fn get(&self, entity: Entity) -> EcsResult<&C> {
        let index = self.index_of(entity).ok_or_else(|| Self::not_found(entity))?;
        Ok(&self.dense[index])
    }

    /// Returns the component owned by `entity`, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotFound`] if `entity` has no component here.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> EcsResult<&mut C> {
        let index = self.index_of(entity).ok_or_else(|| Self::not_found(entity))?;
        Ok(&mut self.dense[index])
    }

    /// Dense slot currently holding `entity`'s component.
    #[inline]
    #[must_use]
    pub fn index_of(&self, entity: Entity) -> Option<usize> {
        self.indices.get(&entity).copied()
    }

    /// Entity owning dense slot `index`.
    #[inline]
    #[must_use]
    pub fn entity_at(&self, index: usize) -> Option<Entity> {
        self.entities.get(index).copied()
    }

    /// All components, in dense order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.dense
    }

    /// All components, in dense order, mutably.
    ///
    /// Values may be changed in place; the layout cannot.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.dense
    }

    /// Owners of the components, parallel to [`as_slice`](Self::as_slice).
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Iterates over `(entity, component)` pairs in dense order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &C)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// Iterates mutably over `(entity, component)` pairs in dense order.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut C)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    /// Drops every component. Keeps the allocation.
    pub fn clear(&mut self) {
        self.dense.clear();
        self.entities.clear();
        self.indices.clear();
    }

    fn not_found(entity: Entity) -> EcsError {
        EcsError::ComponentNotFound {
            entity,
            component: type_name::<C>(),
        }
    }
}

/// Non-generic view of a [`ComponentStore`].
///
/// The catalog keeps stores behind this trait and recovers the concrete
/// type with a checked downcast.
pub trait ErasedStore {
    /// Type name of the stored component.
    fn component_name(&self) -> &'static str;

    /// Number of live components.
    fn len(&self) -> usize;

    /// Checks if the store holds no components.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if `entity` owns a component in this store.
    fn contains(&self, entity: Entity) -> bool;

    /// Drops `entity`'s component if present. Returns whether one was removed.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Upcast for downcasting to the concrete store.
    fn as_store_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete store.
    fn as_store_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedStore for ComponentStore<C> {
    fn component_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.indices.contains_key(&entity)
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_ok()
    }

    fn as_store_any(&self) -> &dyn Any {
        self
    }

    fn as_store_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Mutable view of a [`ComponentStore`] that can edit values but not layout.
///
/// Handed out by [`ComponentCatalog::store_mut`](super::ComponentCatalog::store_mut)
/// so dense iteration cannot add or drop components behind the catalog's
/// signatures.
pub struct StoreViewMut<'a, C: Component> {
    store: &'a mut ComponentStore<C>,
}

impl<'a, C: Component> StoreViewMut<'a, C> {
    pub(crate) fn new(store: &'a mut ComponentStore<C>) -> Self {
        Self { store }
    }

    /// Number of live components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Checks if the store holds no components.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Checks if `entity` owns a component in this store.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.store.contains(entity)
    }

    /// Returns `entity`'s component.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotFound`] if `entity` has none.
    #[inline]
    pub fn get(&self, entity: Entity) -> EcsResult<&C> {
        self.store.get(entity)
    }

    /// Returns `entity`'s component, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotFound`] if `entity` has none.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> EcsResult<&mut C> {
        self.store.get_mut(entity)
    }

    /// All components, in dense order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        self.store.as_slice()
    }

    /// All components, in dense order, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        self.store.as_mut_slice()
    }

    /// Owners of the components, parallel to [`as_slice`](Self::as_slice).
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.store.entities()
    }

    /// Iterates mutably over `(entity, component)` pairs in dense order.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut C)> {
        self.store.iter_mut()
    }
}
