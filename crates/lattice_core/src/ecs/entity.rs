//! # Entity Management
//!
//! Entities are opaque integer identifiers with no payload of their own.
//! All state lives in component stores.
//!
//! Ids are issued by a monotonically increasing counter and are never
//! reused. Destroying an entity means removing its components; the id
//! itself stays valid forever.

use std::fmt;

use crate::error::{EcsError, EcsResult};

/// Unique identifier for an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Wraps a raw id.
    ///
    /// Mostly useful for tests and for callers that persist ids elsewhere.
    #[inline]
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates entity identifiers.
///
/// Every id returned is strictly greater than all previously issued ones.
/// The registry does not track liveness.
#[derive(Debug)]
pub struct EntityRegistry {
    /// Next id to hand out, `None` once the id space is spent.
    next: Option<u32>,
    /// Number of ids issued so far.
    issued: u64,
}

impl EntityRegistry {
    /// Creates an empty registry. The first entity will be `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: Some(0),
            issued: 0,
        }
    }

    /// Creates a fresh entity.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityIdsExhausted`] after `u32::MAX` has been issued.
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        let id = self.next.ok_or(EcsError::EntityIdsExhausted)?;
        self.next = id.checked_add(1);
        self.issued += 1;
        Ok(Entity(id))
    }

    /// Returns the id the next call to [`create_entity`](Self::create_entity)
    /// will hand out, if any remain.
    #[inline]
    #[must_use]
    pub fn peek_next(&self) -> Option<Entity> {
        self.next.map(Entity)
    }

    /// Number of entities created so far.
    #[inline]
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.issued
    }

    /// Creates a registry whose next id is `next`.
    #[cfg(test)]
    pub(crate) const fn starting_at(next: u32) -> Self {
        Self {
            next: Some(next),
            issued: 0,
        }
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
