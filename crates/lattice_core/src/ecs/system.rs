//! # System Registry
//!
//! Systems are update-able objects driven once per tick, in registration
//! order, by a frame driver outside this crate.
//!
//! The registry owns every system. Callers get a typed [`SystemHandle`]
//! back and use it to reach the concrete system later.

use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, trace_span};

use super::world::World;

/// Upcast helper so boxed systems can be downcast to their concrete type.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    /// Upcast to `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Upcast to `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior run once per tick.
///
/// `update` cannot fail: a system handles its own errors.
///
/// # Example
///
/// ```rust
/// use lattice_core::{System, World};
///
/// #[derive(Default)]
/// struct Clock {
///     elapsed: f64,
/// }
///
/// impl System for Clock {
///     fn update(&mut self, _world: &mut World, delta_time: f64) {
///         self.elapsed += delta_time;
///     }
/// }
/// ```
pub trait System: AsAny {
    /// Name used in logs. Defaults to the type name.
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    /// Advances the system by `delta_time` seconds.
    fn update(&mut self, world: &mut World, delta_time: f64);
}

/// Typed reference to a system owned by a [`SystemRegistry`].
pub struct SystemHandle<S> {
    index: usize,
    _marker: PhantomData<fn() -> S>,
}

impl<S> SystemHandle<S> {
    /// Position of the system in update order.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl<S> Clone for SystemHandle<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for SystemHandle<S> {}

impl<S> PartialEq for SystemHandle<S> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<S> Eq for SystemHandle<S> {}

impl<S> fmt::Debug for SystemHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemHandle")
            .field("system", &type_name::<S>())
            .field("index", &self.index)
            .finish()
    }
}

/// Owns systems and runs them in registration order.
#[derive(Default)]
pub struct SystemRegistry {
    systems: Vec<Box<dyn System>>,
}

impl SystemRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a default `S`, takes ownership of it, and returns its handle.
    pub fn register_system<S: System + Default>(&mut self) -> SystemHandle<S> {
        self.add_system(S::default())
    }

    /// Takes ownership of an already configured `system`.
    pub fn add_system<S: System>(&mut self, system: S) -> SystemHandle<S> {
        let index = self.systems.len();
        debug!(system = system.name(), index, "registered system");
        self.systems.push(Box::new(system));
        SystemHandle {
            index,
            _marker: PhantomData,
        }
    }

    /// Returns the system behind `handle`.
    ///
    /// `None` if the handle came from a different registry holding another
    /// type at that position.
    #[must_use]
    pub fn get<S: System>(&self, handle: SystemHandle<S>) -> Option<&S> {
        self.systems
            .get(handle.index)?
            .as_ref()
            .as_any()
            .downcast_ref::<S>()
    }

    /// Returns the system behind `handle`, mutably.
    #[must_use]
    pub fn get_mut<S: System>(&mut self, handle: SystemHandle<S>) -> Option<&mut S> {
        self.systems
            .get_mut(handle.index)?
            .as_mut()
            .as_any_mut()
            .downcast_mut::<S>()
    }

    /// Runs every system once, in registration order, with the same
    /// `delta_time`.
    pub fn update_all(&mut self, world: &mut World, delta_time: f64) {
        for system in &mut self.systems {
            let _span = trace_span!("system_update", system = system.name(), delta_time).entered();
            system.update(world, delta_time);
        }
    }

    /// Number of registered systems.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Checks if no system is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// System names in update order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|system| system.name())
    }
}
