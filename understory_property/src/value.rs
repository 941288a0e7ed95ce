// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of property value shapes.
//!
//! [`ValueRef`] is how a property exposes its current value without knowing
//! who asks; [`Value`] is the owned form handed to
//! [`Property::try_assign`](crate::Property::try_assign). Kinds defined outside
//! this crate travel as [`CustomValue`].

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use chrono::NaiveDateTime;
use understory_units::Quantity;

use crate::enumeration::Enumeration;
use crate::types::{CheckState, Color, Point3, StringMetadata};

/// An owned property value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Real number.
    Double(f64),
    /// Opaque bytes.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
    /// Ordered list of texts.
    TextList(Vec<String>),
    /// Date and time without time zone.
    DateTime(NaiveDateTime),
    /// RGB color.
    Color(Color),
    /// Enumeration discriminant.
    Enumeration(i64),
    /// Physical quantity, in the internal unit of its dimension.
    Quantity(Quantity),
    /// Tri-state check.
    CheckState(CheckState),
    /// 3D point.
    Point(Point3),
    /// List of `name = value` entries.
    MetadataList(Vec<StringMetadata>),
    /// Payload of a kind defined outside this crate.
    Custom(CustomValue),
}

impl Value {
    /// Returns a short name of the shape, used in diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::TextList(_) => "text list",
            Self::DateTime(_) => "date-time",
            Self::Color(_) => "color",
            Self::Enumeration(_) => "enumeration",
            Self::Quantity(_) => "quantity",
            Self::CheckState(_) => "check state",
            Self::Point(_) => "point",
            Self::MetadataList(_) => "metadata list",
            Self::Custom(_) => "custom",
        }
    }
}

/// A borrowed view of a property value.
///
/// Enumeration values carry their enumeration so consumers can map the
/// discriminant to its symbolic name.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ValueRef<'a> {
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Real number.
    Double(f64),
    /// Opaque bytes.
    Bytes(&'a [u8]),
    /// UTF-8 text.
    Text(&'a str),
    /// Ordered list of texts.
    TextList(&'a [String]),
    /// Date and time without time zone.
    DateTime(NaiveDateTime),
    /// RGB color.
    Color(Color),
    /// Enumeration discriminant and the enumeration it belongs to.
    Enumeration {
        /// Current discriminant.
        value: i64,
        /// Items the discriminant is drawn from.
        enumeration: &'a Enumeration,
    },
    /// Physical quantity, in the internal unit of its dimension.
    Quantity(Quantity),
    /// Tri-state check.
    CheckState(CheckState),
    /// 3D point.
    Point(Point3),
    /// List of `name = value` entries.
    MetadataList(&'a [StringMetadata]),
    /// Payload of a kind defined outside this crate.
    Custom(&'a CustomValue),
}

impl ValueRef<'_> {
    /// Returns a short name of the shape, used in diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::TextList(_) => "text list",
            Self::DateTime(_) => "date-time",
            Self::Color(_) => "color",
            Self::Enumeration { .. } => "enumeration",
            Self::Quantity(_) => "quantity",
            Self::CheckState(_) => "check state",
            Self::Point(_) => "point",
            Self::MetadataList(_) => "metadata list",
            Self::Custom(_) => "custom",
        }
    }

    /// Copies the view into an owned [`Value`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        match *self {
            Self::Bool(v) => Value::Bool(v),
            Self::Int(v) => Value::Int(v),
            Self::Double(v) => Value::Double(v),
            Self::Bytes(v) => Value::Bytes(v.into()),
            Self::Text(v) => Value::Text(v.into()),
            Self::TextList(v) => Value::TextList(v.into()),
            Self::DateTime(v) => Value::DateTime(v),
            Self::Color(v) => Value::Color(v),
            Self::Enumeration { value, .. } => Value::Enumeration(value),
            Self::Quantity(v) => Value::Quantity(v),
            Self::CheckState(v) => Value::CheckState(v),
            Self::Point(v) => Value::Point(v),
            Self::MetadataList(v) => Value::MetadataList(v.into()),
            Self::Custom(v) => Value::Custom(v.clone()),
        }
    }
}

/// A clonable, comparable, type-erased value.
///
/// ```rust
/// use understory_property::CustomValue;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Transform([f64; 3]);
///
/// let value = CustomValue::new(Transform([1.0, 0.0, 0.0]));
/// assert!(value.is::<Transform>());
/// assert_eq!(value.downcast_ref::<Transform>(), Some(&Transform([1.0, 0.0, 0.0])));
/// assert_eq!(value.clone(), value);
/// ```
pub struct CustomValue(Box<dyn CustomPayload>);

impl CustomValue {
    /// Wraps a concrete value.
    #[must_use]
    pub fn new<T: Clone + PartialEq + fmt::Debug + 'static>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Returns `true` if the payload is of type `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Attempts to downcast the payload.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        let any: &dyn Any = &*self.0;
        any.downcast_ref()
    }
}

impl Clone for CustomValue {
    fn clone(&self) -> Self {
        Self(self.0.clone_boxed())
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_payload(&*other.0)
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomValue").field(&self.0).finish()
    }
}

trait CustomPayload: Any + fmt::Debug {
    fn clone_boxed(&self) -> Box<dyn CustomPayload>;
    fn eq_payload(&self, other: &dyn CustomPayload) -> bool;
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> CustomPayload for T {
    fn clone_boxed(&self) -> Box<dyn CustomPayload> {
        Box::new(self.clone())
    }

    fn eq_payload(&self, other: &dyn CustomPayload) -> bool {
        let other: &dyn Any = other;
        other.downcast_ref::<T>() == Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;

    #[derive(Clone, Debug, PartialEq)]
    struct Trsf([f64; 2]);

    #[test]
    fn custom_value_compares_by_payload() {
        let a = CustomValue::new(Trsf([1.0, 2.0]));
        assert_eq!(a, CustomValue::new(Trsf([1.0, 2.0])));
        assert_ne!(a, CustomValue::new(Trsf([1.0, 3.0])));
        assert_ne!(a, CustomValue::new(1_i32));
        assert!(!a.is::<i32>());
    }

    #[test]
    fn custom_value_debug_shows_payload() {
        let a = CustomValue::new(7_u8);
        assert_eq!(format!("{a:?}"), "CustomValue(7)");
    }

    #[test]
    fn view_to_owned() {
        let list = vec![String::from("a"), String::from("b")];
        let view = ValueRef::TextList(&list);
        assert_eq!(view.to_value(), Value::TextList(list.clone()));
        assert_eq!(view.kind_name(), "text list");

        let e = Enumeration::new();
        let view = ValueRef::Enumeration {
            value: 3,
            enumeration: &e,
        };
        assert_eq!(view.to_value(), Value::Enumeration(3));
        assert_eq!(view.to_value().kind_name(), view.kind_name());
    }
}
