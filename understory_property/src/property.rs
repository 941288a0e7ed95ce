// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The type-erased property contract.

use alloc::string::String;
use core::any::{Any, TypeId};
use core::fmt;

use understory_units::Unit;

use crate::id::PropertyId;
use crate::text_id::TextId;
use crate::value::{Value, ValueRef};

/// State shared by every property kind.
///
/// The enabled flag is only writable through
/// [`PropertyRegistry::set_enabled`](crate::PropertyRegistry::set_enabled) so
/// that every change is announced to observers.
#[derive(Clone, Debug)]
pub struct PropertyBase {
    name: TextId,
    description: String,
    enabled: bool,
    user_visible: bool,
    user_read_only: bool,
}

impl PropertyBase {
    /// Creates the state of an enabled, visible, editable property.
    #[must_use]
    pub fn new(name: TextId) -> Self {
        Self {
            name,
            description: String::new(),
            enabled: true,
            user_visible: true,
            user_read_only: false,
        }
    }

    /// Returns the identifier.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &TextId {
        &self.name
    }

    /// Returns the description, empty if none.
    #[must_use]
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Sets the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Returns `true` if the property is enabled.
    #[must_use]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns `true` if the property should be listed in user interfaces.
    #[must_use]
    #[inline]
    pub fn is_user_visible(&self) -> bool {
        self.user_visible
    }

    /// Shows or hides the property in user interfaces.
    pub fn set_user_visible(&mut self, visible: bool) {
        self.user_visible = visible;
    }

    /// Returns `true` if user interfaces must not offer editing.
    #[must_use]
    #[inline]
    pub fn is_user_read_only(&self) -> bool {
        self.user_read_only
    }

    /// Makes the property read-only in user interfaces.
    ///
    /// Programmatic assignment is unaffected.
    pub fn set_user_read_only(&mut self, read_only: bool) {
        self.user_read_only = read_only;
    }
}

/// Why a value was refused.
///
/// A refused assignment never modifies the property.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SetValueError {
    /// The value has the wrong shape for this property kind.
    #[error("expected a {expected} value, got {found}")]
    TypeMismatch {
        /// Shape accepted by the property.
        expected: &'static str,
        /// Shape that was offered.
        found: &'static str,
    },
    /// The value violates a range constraint, or is NaN under constraints.
    #[error("value {0} is out of range")]
    OutOfRange(f64),
    /// No enumeration item has this value.
    #[error("no enumeration item has value {0}")]
    UnknownEnumerationValue(i64),
    /// No enumeration item has this name.
    #[error("no enumeration item named '{0}'")]
    UnknownEnumerationName(String),
    /// The quantity is of another dimension.
    #[error("expected a quantity of dimension {expected}, got {found}")]
    UnitMismatch {
        /// Dimension of the property.
        expected: Unit,
        /// Dimension that was offered.
        found: Unit,
    },
    /// The id does not refer to a live property.
    #[error("no property with id {0}")]
    UnknownProperty(PropertyId),
}

/// A named, typed, observable piece of state.
///
/// Concrete kinds implement this to live in a
/// [`PropertyRegistry`](crate::PropertyRegistry). Mutation through the registry
/// notifies observers; a property that is not in a registry has none.
///
/// # Implementing a kind
///
/// ```rust
/// use understory_property::{
///     CustomValue, Property, PropertyBase, SetValueError, TextId, Value, ValueRef,
/// };
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Trsf([f64; 3]);
///
/// #[derive(Debug)]
/// struct PropertyTrsf {
///     base: PropertyBase,
///     value: CustomValue,
/// }
///
/// impl Property for PropertyTrsf {
///     fn base(&self) -> &PropertyBase { &self.base }
///     fn base_mut(&mut self) -> &mut PropertyBase { &mut self.base }
///     fn type_name(&self) -> &'static str { "PropertyTrsf" }
///     fn value_ref(&self) -> ValueRef<'_> { ValueRef::Custom(&self.value) }
///     fn try_assign(&mut self, value: Value) -> Result<(), SetValueError> {
///         match value {
///             Value::Custom(v) if v.is::<Trsf>() => {
///                 self.value = v;
///                 Ok(())
///             }
///             other => Err(SetValueError::TypeMismatch {
///                 expected: "transform",
///                 found: other.kind_name(),
///             }),
///         }
///     }
///     fn restore_default(&mut self) {
///         self.value = CustomValue::new(Trsf([0.0; 3]));
///     }
/// }
///
/// let mut p = PropertyTrsf {
///     base: PropertyBase::new(TextId::new("Demo", "placement")),
///     value: CustomValue::new(Trsf([0.0; 3])),
/// };
/// assert!(p.try_assign(Value::Int(3)).is_err());
/// p.try_assign(Value::Custom(CustomValue::new(Trsf([1.0, 2.0, 3.0])))).unwrap();
/// assert_eq!(p.name().key(), "placement");
/// ```
pub trait Property: Any + fmt::Debug {
    /// Returns the shared state.
    fn base(&self) -> &PropertyBase;

    /// Returns the shared state, mutably.
    fn base_mut(&mut self) -> &mut PropertyBase;

    /// Returns a stable name for the concrete kind, used in diagnostics.
    fn type_name(&self) -> &'static str;

    /// Returns a view of the current value.
    fn value_ref(&self) -> ValueRef<'_>;

    /// Replaces the value after checking it against the kind's constraints.
    ///
    /// On error the property is left unchanged.
    fn try_assign(&mut self, value: Value) -> Result<(), SetValueError>;

    /// Resets the value to the kind's default.
    fn restore_default(&mut self);

    /// Returns `true` if the value equals the default.
    ///
    /// Kinds that cannot tell return `false`.
    fn is_default(&self) -> bool {
        false
    }

    /// Returns the identifier.
    fn name(&self) -> &TextId {
        self.base().name()
    }

    /// Returns the description.
    fn description(&self) -> &str {
        self.base().description()
    }

    /// Returns `true` if the property is enabled.
    fn is_enabled(&self) -> bool {
        self.base().is_enabled()
    }
}

impl dyn Property {
    /// Returns `true` if the concrete kind is `P`.
    #[must_use]
    pub fn is<P: Property>(&self) -> bool {
        self.kind_id() == TypeId::of::<P>()
    }

    /// Returns the [`TypeId`] of the concrete kind.
    #[must_use]
    pub fn kind_id(&self) -> TypeId {
        let any: &dyn Any = self;
        any.type_id()
    }

    /// Downcasts to a concrete kind.
    #[must_use]
    pub fn downcast_ref<P: Property>(&self) -> Option<&P> {
        let any: &dyn Any = self;
        any.downcast_ref()
    }

    /// Downcasts to a concrete kind, mutably.
    #[must_use]
    pub fn downcast_mut<P: Property>(&mut self) -> Option<&mut P> {
        let any: &mut dyn Any = self;
        any.downcast_mut()
    }
}

/// A property kind with a statically known value type.
pub trait TypedProperty: Property {
    /// The value type.
    type Value;

    /// Returns the current value.
    fn get(&self) -> &Self::Value;

    /// Replaces the value after checking it against the kind's constraints.
    ///
    /// On error the property is left unchanged.
    fn set_value(&mut self, value: Self::Value) -> Result<(), SetValueError>;
}
