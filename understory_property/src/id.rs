// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles into a [`PropertyRegistry`](crate::PropertyRegistry).
//!
//! This module provides [`PropertyId`] and [`GroupId`] for runtime
//! identification and [`PropertyHandle<P>`] for typed access to a property of a
//! known concrete kind.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// A runtime property identifier.
///
/// Ids are never reused: once a property is removed its id stays dead, so a
/// stale id held by a collaborator can only miss, never alias a newer property.
///
/// ```rust
/// use understory_property::PropertyId;
///
/// let id = PropertyId::new(42);
/// assert_eq!(id.index(), 42);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u32);

impl PropertyId {
    /// Creates a property id from a raw index.
    ///
    /// This is typically called by
    /// [`PropertyRegistry::insert`](crate::PropertyRegistry::insert) rather than
    /// directly.
    #[must_use]
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyId").field(&self.0).finish()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId({})", self.0)
    }
}

/// Identifies a property group inside a registry.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(u32);

impl GroupId {
    /// Creates a group id from a raw index.
    #[must_use]
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GroupId").field(&self.0).finish()
    }
}

/// Identifies a listener registered with
/// [`PropertyRegistry::add_listener`](crate::PropertyRegistry::add_listener).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u32);

/// A typed handle to a property of concrete kind `P`.
///
/// Handles are what collaborators keep after handing a property over to the
/// registry. The phantom type lets [`PropertyRegistry::get_typed`] and
/// [`PropertyRegistry::set`] downcast and type-check at compile time.
///
/// ```rust
/// use understory_property::{PropertyBool, PropertyRegistry, TextId};
///
/// let mut registry = PropertyRegistry::new();
/// let flag = registry.insert(None, PropertyBool::new(TextId::new("Demo", "flag"), false));
///
/// registry.set(flag, true).unwrap();
/// assert_eq!(registry.value(flag), Some(&true));
/// // registry.set(flag, 3_i64); // Would not compile!
/// ```
///
/// [`PropertyRegistry::get_typed`]: crate::PropertyRegistry::get_typed
/// [`PropertyRegistry::set`]: crate::PropertyRegistry::set
pub struct PropertyHandle<P> {
    id: PropertyId,
    _marker: PhantomData<fn() -> P>,
}

impl<P> PropertyHandle<P> {
    /// Wraps an id.
    ///
    /// The caller must make sure the id refers to a property of kind `P`;
    /// otherwise typed lookups through this handle return `None`.
    #[must_use]
    #[inline]
    pub const fn from_id(id: PropertyId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the untyped id.
    #[must_use]
    #[inline]
    pub const fn id(self) -> PropertyId {
        self.id
    }
}

impl<P> From<PropertyHandle<P>> for PropertyId {
    #[inline]
    fn from(handle: PropertyHandle<P>) -> Self {
        handle.id
    }
}

// Manual trait implementations to avoid requiring bounds on P.

impl<P> Copy for PropertyHandle<P> {}

impl<P> Clone for PropertyHandle<P> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> PartialEq for PropertyHandle<P> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<P> Eq for PropertyHandle<P> {}

impl<P> Hash for PropertyHandle<P> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<P> fmt::Debug for PropertyHandle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyHandle")
            .field("id", &self.id)
            .field("kind", &core::any::type_name::<P>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    struct Kind;

    #[test]
    fn ids_format() {
        assert_eq!(format!("{:?}", PropertyId::new(7)), "PropertyId(7)");
        assert_eq!(format!("{}", PropertyId::new(7)), "PropertyId(7)");
        assert_eq!(format!("{:?}", GroupId::new(3)), "GroupId(3)");
    }

    #[test]
    fn handle_is_copy_without_bounds() {
        // `Kind` is neither Copy nor PartialEq.
        let handle: PropertyHandle<Kind> = PropertyHandle::from_id(PropertyId::new(1));
        let copy = handle;
        assert_eq!(handle, copy);
        assert_eq!(PropertyId::from(copy), PropertyId::new(1));
    }

    #[test]
    fn handle_is_id_sized() {
        use core::mem::size_of;
        assert_eq!(size_of::<PropertyHandle<Kind>>(), size_of::<PropertyId>());
    }
}
