//! # LATTICE Core Engine
//!
//! Entity Component System data store:
//! - Entities are lightweight integer ids
//! - Components of each type live in one dense, cache-friendly array
//! - Signatures record which component types each entity owns
//! - Systems are driven once per tick in registration order
//!
//! ## Architecture Rules
//!
//! 1. **Single-threaded** - no internal locking; one thread owns the world
//! 2. **Checked lookups** - misses are errors, never default-constructed
//! 3. **Borrowed access** - component references cannot outlive a structural change
//!
//! ## Example
//!
//! ```rust
//! use lattice_core::{System, SystemRegistry, World};
//!
//! struct Position(f64);
//! struct Velocity(f64);
//!
//! #[derive(Default)]
//! struct Movement;
//!
//! impl System for Movement {
//!     fn update(&mut self, world: &mut World, delta_time: f64) {
//!         let Ok(required) = world.components().signature_of::<Position>() else {
//!             return;
//!         };
//!         let movers: Vec<_> = world.query(required).collect();
//!         for entity in movers {
//!             let Ok(speed) = world.get_component::<Velocity>(entity).map(|v| v.0) else {
//!                 continue;
//!             };
//!             if let Ok(position) = world.get_component_mut::<Position>(entity) {
//!                 position.0 += speed * delta_time;
//!             }
//!         }
//!     }
//! }
//!
//! let mut world = World::new();
//! world.register_component::<Position>()?;
//! world.register_component::<Velocity>()?;
//!
//! let ship = world.create_entity()?;
//! world.add_component(ship, Position(0.0))?;
//! world.add_component(ship, Velocity(2.0))?;
//!
//! let mut systems = SystemRegistry::new();
//! systems.register_system::<Movement>();
//! systems.update_all(&mut world, 0.5);
//!
//! assert_eq!(world.get_component::<Position>(ship)?.0, 1.0);
//! # Ok::<(), lattice_core::EcsError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;

pub use config::EcsConfig;
pub use ecs::{
    AsAny, Component, ComponentCatalog, ComponentStore, ComponentTypeId, Entity, EntityRegistry,
    ErasedStore, Signature, StoreLimits, StoreViewMut, System, SystemHandle, SystemRegistry,
    World, MAX_COMPONENT_TYPES,
};
pub use error::{EcsError, EcsResult};
