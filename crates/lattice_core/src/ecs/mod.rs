//! # Entity Component System
//!
//! Dense, type-erased component storage with signature queries.
//!
//! ## Design Philosophy
//!
//! - One dense array per component type, compacted by swap-remove
//! - Entity IDs are plain monotonic integers, never reused
//! - Component types are keyed by `TypeId`, recovered by checked downcast
//! - Every precondition violation is a typed error, never silent corruption

mod catalog;
mod component;
mod entity;
mod storage;
mod system;
mod world;

pub use catalog::ComponentCatalog;
pub use component::{Component, ComponentTypeId, Signature, MAX_COMPONENT_TYPES};
pub use entity::{Entity, EntityRegistry};
pub use storage::{ComponentStore, ErasedStore, StoreLimits, StoreViewMut};
pub use system::{AsAny, System, SystemHandle, SystemRegistry};
pub use world::World;
