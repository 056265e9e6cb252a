//! # ECS Error Types
//!
//! All errors that can occur while storing or querying components.
//!
//! Every variant is a local, synchronous failure returned to the immediate
//! caller. Nothing is retried and nothing is recovered inside the core.

use thiserror::Error;

use crate::ecs::Entity;

/// Errors that can occur in the ECS core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A component type was used before being registered with the catalog.
    #[error("component type `{component}` is not registered")]
    UnregisteredComponent {
        /// Type name of the component.
        component: &'static str,
    },

    /// The entity already owns a component of this type.
    #[error("entity {entity} already has a `{component}` component")]
    DuplicateComponent {
        /// The entity that was targeted.
        entity: Entity,
        /// Type name of the component.
        component: &'static str,
    },

    /// The entity does not own a component of this type.
    #[error("entity {entity} has no `{component}` component")]
    ComponentNotFound {
        /// The entity that was targeted.
        entity: Entity,
        /// Type name of the component.
        component: &'static str,
    },

    /// The store for this component type is full.
    #[error("store for `{component}` is full: capacity {capacity}")]
    CapacityExceeded {
        /// Type name of the component.
        component: &'static str,
        /// Maximum number of live components of this type.
        capacity: usize,
    },

    /// Every entity id representable by [`Entity`] has been issued.
    #[error("entity ids exhausted")]
    EntityIdsExhausted,

    /// All signature bits are taken.
    #[error("too many component types: at most {max} can be registered")]
    TooManyComponentTypes {
        /// Width of the signature.
        max: usize,
    },

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;
