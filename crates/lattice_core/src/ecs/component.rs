//! # Component Types and Signatures
//!
//! Components are plain values with no required behavior. Any `'static`
//! type can be stored.
//!
//! Each registered component type is assigned one bit of a [`Signature`].
//! An entity's signature has bit *k* set iff it owns a component of the
//! type assigned index *k*.

use std::fmt;
use std::ops::BitOr;

/// Maximum number of distinct component types (width of a [`Signature`]).
pub const MAX_COMPONENT_TYPES: usize = 32;

/// Marker trait for ECS components.
///
/// Blanket-implemented for every `'static` type, so component types are
/// open-ended:
///
/// ```rust
/// use lattice_core::Component;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Health(u32);
///
/// fn assert_component<C: Component>() {}
/// assert_component::<Health>();
/// ```
pub trait Component: 'static {}

impl<T: 'static> Component for T {}

/// Signature bit assigned to a component type.
///
/// Stable for the lifetime of the catalog that assigned it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentTypeId(u8);

impl ComponentTypeId {
    /// Creates an id from a bit index.
    ///
    /// Returns `None` if `index >= MAX_COMPONENT_TYPES`.
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Option<Self> {
        if index < MAX_COMPONENT_TYPES {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Bit position in the signature.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    const fn mask(self) -> u32 {
        1 << self.0
    }
}

/// Fixed-width bitset of component types.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Signature(u32);

impl Signature {
    /// Signature with no bits set.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns a copy with `id` set.
    #[inline]
    #[must_use]
    pub const fn with(self, id: ComponentTypeId) -> Self {
        Self(self.0 | id.mask())
    }

    /// Sets the bit for `id`.
    #[inline]
    pub fn set(&mut self, id: ComponentTypeId) {
        self.0 |= id.mask();
    }

    /// Clears the bit for `id`.
    #[inline]
    pub fn clear(&mut self, id: ComponentTypeId) {
        self.0 &= !id.mask();
    }

    /// Checks a single bit.
    #[inline]
    #[must_use]
    pub const fn contains(self, id: ComponentTypeId) -> bool {
        self.0 & id.mask() != 0
    }

    /// Checks that every bit of `required` is also set here.
    #[inline]
    #[must_use]
    pub const fn contains_all(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    /// No bits set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of bits set.
    #[inline]
    #[must_use]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates over the set ids in ascending bit order.
    pub fn iter(self) -> impl Iterator<Item = ComponentTypeId> {
        let mut remaining = self.0;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            let bit = remaining.trailing_zeros();
            remaining &= remaining - 1;
            Some(ComponentTypeId(bit as u8))
        })
    }
}

impl BitOr for Signature {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl FromIterator<ComponentTypeId> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentTypeId>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#034b})", self.0)
    }
}
