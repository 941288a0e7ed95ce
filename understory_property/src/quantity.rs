// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Properties holding a physical quantity.

use alloc::string::String;

use understory_units::{Quantity, Unit};

use crate::property::{Property, PropertyBase, SetValueError, TypedProperty};
use crate::text_id::TextId;
use crate::value::{Value, ValueRef};

/// A real number of a fixed physical dimension.
///
/// The value is always kept in the internal unit of the dimension
/// (millimetres, radians, ...); conversion to display units happens at the
/// edges.
///
/// ```rust
/// use understory_property::{PropertyQuantity, TextId};
/// use understory_units::Unit;
///
/// let mut size = PropertyQuantity::length(TextId::new("Export", "size"), 25.4);
/// assert_eq!(size.quantity_unit(), Unit::Length);
/// size.set_quantity_value(10.0).unwrap();
/// assert_eq!(size.quantity_value(), 10.0);
/// ```
#[derive(Clone, Debug)]
pub struct PropertyQuantity {
    base: PropertyBase,
    unit: Unit,
    value: f64,
    default: f64,
    minimum: Option<f64>,
    maximum: Option<f64>,
}

impl PropertyQuantity {
    /// Creates a property of dimension `unit` with `default` in its internal
    /// unit.
    #[must_use]
    pub fn new(name: TextId, unit: Unit, default: f64) -> Self {
        Self {
            base: PropertyBase::new(name),
            unit,
            value: default,
            default,
            minimum: None,
            maximum: None,
        }
    }

    /// Creates a length property, `default` in millimetres.
    #[must_use]
    pub fn length(name: TextId, default: f64) -> Self {
        Self::new(name, Unit::Length, default)
    }

    /// Creates an angle property, `default` in radians.
    #[must_use]
    pub fn angle(name: TextId, default: f64) -> Self {
        Self::new(name, Unit::Angle, default)
    }

    /// Sets the description, builder style.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.base.set_description(description);
        self
    }

    /// Sets an inclusive range in the internal unit, builder style.
    #[must_use]
    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    /// Returns the value in the internal unit.
    #[must_use]
    pub fn quantity_value(&self) -> f64 {
        self.value
    }

    /// Returns the dimension.
    #[must_use]
    pub fn quantity_unit(&self) -> Unit {
        self.unit
    }

    /// Returns value and dimension together.
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        Quantity::new(self.value, self.unit)
    }

    /// Sets the value, given in the internal unit.
    pub fn set_quantity_value(&mut self, value: f64) -> Result<(), SetValueError> {
        let ranged = self.minimum.is_some() || self.maximum.is_some();
        let out_of_range = (ranged && value.is_nan())
            || self.minimum.is_some_and(|min| value < min)
            || self.maximum.is_some_and(|max| value > max);
        if out_of_range {
            return Err(SetValueError::OutOfRange(value));
        }
        self.value = value;
        Ok(())
    }
}

impl Property for PropertyQuantity {
    fn base(&self) -> &PropertyBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PropertyBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "PropertyQuantity"
    }

    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Quantity(self.quantity())
    }

    fn try_assign(&mut self, value: Value) -> Result<(), SetValueError> {
        match value {
            Value::Quantity(q) if q.unit() == self.unit => self.set_quantity_value(q.value()),
            Value::Quantity(q) => Err(SetValueError::UnitMismatch {
                expected: self.unit,
                found: q.unit(),
            }),
            Value::Double(v) => self.set_quantity_value(v),
            other => Err(SetValueError::TypeMismatch {
                expected: "quantity",
                found: other.kind_name(),
            }),
        }
    }

    fn restore_default(&mut self) {
        self.value = self.default;
    }

    fn is_default(&self) -> bool {
        self.value == self.default
    }
}

impl TypedProperty for PropertyQuantity {
    type Value = f64;

    fn get(&self) -> &f64 {
        &self.value
    }

    fn set_value(&mut self, value: f64) -> Result<(), SetValueError> {
        self.set_quantity_value(value)
    }
}
