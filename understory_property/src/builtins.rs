// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in property kinds.
//!
//! [`GenericProperty<T>`] covers every kind that is just "a value of type `T`
//! with a default"; [`ScalarProperty<T>`] adds range and step constraints for
//! numbers.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use chrono::NaiveDateTime;

use crate::property::{Property, PropertyBase, SetValueError, TypedProperty};
use crate::text_id::TextId;
use crate::types::{CheckState, Color, Point3, StringMetadata};
use crate::value::{Value, ValueRef};

/// A value type that can back a [`GenericProperty`].
pub trait PropertyValueType: Clone + PartialEq + fmt::Debug + 'static {
    /// Name of the property kind, used in diagnostics.
    const KIND_NAME: &'static str;

    /// Returns the borrowed view of `self`.
    fn as_value_ref(&self) -> ValueRef<'_>;

    /// Extracts `Self` from an owned value, handing it back on mismatch.
    fn from_value(value: Value) -> Result<Self, Value>;
}

macro_rules! impl_value_type {
    ($ty:ty, $kind:literal, $variant:ident, |$v:ident| $view:expr) => {
        impl PropertyValueType for $ty {
            const KIND_NAME: &'static str = $kind;

            fn as_value_ref(&self) -> ValueRef<'_> {
                let $v = self;
                ValueRef::$variant($view)
            }

            fn from_value(value: Value) -> Result<Self, Value> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(other),
                }
            }
        }
    };
}

impl_value_type!(bool, "PropertyBool", Bool, |v| *v);
impl_value_type!(Vec<u8>, "PropertyBytes", Bytes, |v| v.as_slice());
impl_value_type!(String, "PropertyText", Text, |v| v.as_str());
impl_value_type!(Vec<String>, "PropertyTextList", TextList, |v| v.as_slice());
impl_value_type!(NaiveDateTime, "PropertyDateTime", DateTime, |v| *v);
impl_value_type!(Color, "PropertyColor", Color, |v| *v);
impl_value_type!(CheckState, "PropertyCheckState", CheckState, |v| *v);
impl_value_type!(Point3, "PropertyPoint", Point, |v| *v);
impl_value_type!(
    Vec<StringMetadata>,
    "PropertyMetadataList",
    MetadataList,
    |v| v.as_slice()
);

/// A property holding a `T`, with a default to restore.
///
/// ```rust
/// use understory_property::{Property, PropertyText, TextId, TypedProperty};
///
/// let mut title = PropertyText::new(TextId::new("Export", "title"), "Untitled".into())
///     .with_description("Written in the file header");
/// title.set_value("Gear".into()).unwrap();
/// assert!(!title.is_default());
/// title.restore_default();
/// assert_eq!(title.get(), "Untitled");
/// ```
#[derive(Clone, Debug)]
pub struct GenericProperty<T> {
    base: PropertyBase,
    value: T,
    default: T,
}

/// Boolean property.
pub type PropertyBool = GenericProperty<bool>;
/// Opaque bytes property.
pub type PropertyBytes = GenericProperty<Vec<u8>>;
/// Text property.
pub type PropertyText = GenericProperty<String>;
/// Text list property.
pub type PropertyTextList = GenericProperty<Vec<String>>;
/// Date-time property.
pub type PropertyDateTime = GenericProperty<NaiveDateTime>;
/// Color property.
pub type PropertyColor = GenericProperty<Color>;
/// Tri-state check property.
pub type PropertyCheckState = GenericProperty<CheckState>;
/// 3D point property.
pub type PropertyPoint = GenericProperty<Point3>;
/// `name = value` list property.
pub type PropertyMetadataList = GenericProperty<Vec<StringMetadata>>;

impl<T: PropertyValueType> GenericProperty<T> {
    /// Creates a property whose value and default are `default`.
    #[must_use]
    pub fn new(name: TextId, default: T) -> Self {
        Self {
            base: PropertyBase::new(name),
            value: default.clone(),
            default,
        }
    }

    /// Sets the description, builder style.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.base.set_description(description);
        self
    }

    /// Returns the default value.
    #[must_use]
    pub fn default_value(&self) -> &T {
        &self.default
    }
}

impl<T: PropertyValueType> Property for GenericProperty<T> {
    fn base(&self) -> &PropertyBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PropertyBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        T::KIND_NAME
    }

    fn value_ref(&self) -> ValueRef<'_> {
        self.value.as_value_ref()
    }

    fn try_assign(&mut self, value: Value) -> Result<(), SetValueError> {
        let value = T::from_value(value).map_err(|other| SetValueError::TypeMismatch {
            expected: self.value.as_value_ref().kind_name(),
            found: other.kind_name(),
        })?;
        self.set_value(value)
    }

    fn restore_default(&mut self) {
        self.value = self.default.clone();
    }

    fn is_default(&self) -> bool {
        self.value == self.default
    }
}

impl<T: PropertyValueType> TypedProperty for GenericProperty<T> {
    type Value = T;

    fn get(&self) -> &T {
        &self.value
    }

    fn set_value(&mut self, value: T) -> Result<(), SetValueError> {
        self.value = value;
        Ok(())
    }
}

/// A number type that can back a [`ScalarProperty`].
pub trait Scalar: Copy + PartialOrd + fmt::Debug + 'static {
    /// Name of the property kind, used in diagnostics.
    const KIND_NAME: &'static str;

    /// Returns the borrowed view of `self`.
    fn as_value_ref(self) -> ValueRef<'static>;

    /// Extracts `Self` from an owned value, handing it back on mismatch.
    fn from_value(value: Value) -> Result<Self, Value>;

    /// Lossy conversion used for error reports.
    fn to_f64(self) -> f64;
}

impl Scalar for i64 {
    const KIND_NAME: &'static str = "PropertyInt";

    fn as_value_ref(self) -> ValueRef<'static> {
        ValueRef::Int(self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(v) => Ok(v),
            other => Err(other),
        }
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Scalar for f64 {
    const KIND_NAME: &'static str = "PropertyDouble";

    fn as_value_ref(self) -> ValueRef<'static> {
        ValueRef::Double(self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Double(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            other => Err(other),
        }
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// A number with optional minimum, maximum and single step.
///
/// Constraints are checked on assignment while they are enabled; NaN never
/// satisfies them.
///
/// ```rust
/// use understory_property::{PropertyInt, SetValueError, TextId, TypedProperty};
///
/// let mut count = PropertyInt::new(TextId::new("Mesh", "subdivisions"), 4)
///     .with_range(1, 16)
///     .with_single_step(1);
/// assert_eq!(count.set_value(32), Err(SetValueError::OutOfRange(32.0)));
/// assert_eq!(*count.get(), 4);
///
/// count.set_constraints_enabled(false);
/// count.set_value(32).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct ScalarProperty<T> {
    base: PropertyBase,
    value: T,
    default: T,
    minimum: Option<T>,
    maximum: Option<T>,
    single_step: Option<T>,
    constraints_enabled: bool,
}

/// Integer property.
pub type PropertyInt = ScalarProperty<i64>;
/// Real property.
pub type PropertyDouble = ScalarProperty<f64>;

impl<T: Scalar> ScalarProperty<T> {
    /// Creates an unconstrained property whose value and default are `default`.
    #[must_use]
    pub fn new(name: TextId, default: T) -> Self {
        Self {
            base: PropertyBase::new(name),
            value: default,
            default,
            minimum: None,
            maximum: None,
            single_step: None,
            constraints_enabled: true,
        }
    }

    /// Sets the description, builder style.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.base.set_description(description);
        self
    }

    /// Sets an inclusive range, builder style.
    #[must_use]
    pub fn with_range(mut self, minimum: T, maximum: T) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    /// Sets the increment suggested to editors, builder style.
    #[must_use]
    pub fn with_single_step(mut self, step: T) -> Self {
        self.single_step = Some(step);
        self
    }

    /// Returns the lower bound, if any.
    #[must_use]
    pub fn minimum(&self) -> Option<T> {
        self.minimum
    }

    /// Returns the upper bound, if any.
    #[must_use]
    pub fn maximum(&self) -> Option<T> {
        self.maximum
    }

    /// Returns the editor increment, if any.
    #[must_use]
    pub fn single_step(&self) -> Option<T> {
        self.single_step
    }

    /// Returns `true` if range constraints are checked.
    #[must_use]
    pub fn constraints_enabled(&self) -> bool {
        self.constraints_enabled
    }

    /// Turns range checking on or off. The current value is kept either way.
    pub fn set_constraints_enabled(&mut self, enabled: bool) {
        self.constraints_enabled = enabled;
    }

    fn check(&self, value: T) -> Result<(), SetValueError> {
        if !self.constraints_enabled {
            return Ok(());
        }
        let out_of_range = value.partial_cmp(&value).is_none()
            || self.minimum.is_some_and(|min| value < min)
            || self.maximum.is_some_and(|max| value > max);
        if out_of_range {
            Err(SetValueError::OutOfRange(value.to_f64()))
        } else {
            Ok(())
        }
    }
}

impl<T: Scalar> Property for ScalarProperty<T> {
    fn base(&self) -> &PropertyBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PropertyBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        T::KIND_NAME
    }

    fn value_ref(&self) -> ValueRef<'_> {
        self.value.as_value_ref()
    }

    fn try_assign(&mut self, value: Value) -> Result<(), SetValueError> {
        let value = T::from_value(value).map_err(|other| SetValueError::TypeMismatch {
            expected: self.value.as_value_ref().kind_name(),
            found: other.kind_name(),
        })?;
        self.set_value(value)
    }

    fn restore_default(&mut self) {
        self.value = self.default;
    }

    fn is_default(&self) -> bool {
        self.value.partial_cmp(&self.default) == Some(core::cmp::Ordering::Equal)
    }
}

impl<T: Scalar> TypedProperty for ScalarProperty<T> {
    type Value = T;

    fn get(&self) -> &T {
        &self.value
    }

    fn set_value(&mut self, value: T) -> Result<(), SetValueError> {
        self.check(value)?;
        self.value = value;
        Ok(())
    }
}
