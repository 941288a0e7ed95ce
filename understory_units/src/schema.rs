// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unit schemas: which unit a dimension is displayed in.

use alloc::format;
use alloc::string::String;

use crate::format::format_general;
use crate::unit::{Unit, find_symbol};

/// A family of display units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnitSchema {
    /// Metric, millimetre based.
    #[default]
    Si,
    /// Imperial, inch based.
    ImperialUk,
}

impl UnitSchema {
    /// Returns the display symbol this schema uses for `unit`.
    #[must_use]
    pub const fn display_symbol(self, unit: Unit) -> &'static str {
        match (self, unit) {
            (_, Unit::None) => "",
            (_, Unit::Time) => "s",
            (_, Unit::Angle) => "°",
            (Self::Si, Unit::Length) => "mm",
            (Self::Si, Unit::Area) => "mm²",
            (Self::Si, Unit::Volume) => "mm³",
            (Self::Si, Unit::Mass) => "kg",
            (Self::Si, Unit::Velocity) => "mm/s",
            (Self::Si, Unit::Density) => "kg/m³",
            (Self::Si, Unit::Pressure) => "kPa",
            (Self::ImperialUk, Unit::Length) => "in",
            (Self::ImperialUk, Unit::Area) => "in²",
            (Self::ImperialUk, Unit::Volume) => "in³",
            (Self::ImperialUk, Unit::Mass) => "lb",
            (Self::ImperialUk, Unit::Velocity) => "in/s",
            (Self::ImperialUk, Unit::Density) => "lb/ft³",
            (Self::ImperialUk, Unit::Pressure) => "psi",
        }
    }
}

/// Outcome of [`translate`] or of quantity parsing.
///
/// The number to use is always `value * factor`: for [`translate`] that is the
/// display number, for parsing it is the value in the internal unit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TranslateResult {
    /// Source value.
    pub value: f64,
    /// Multiplier applied to `value`.
    pub factor: f64,
    /// Unit symbol; empty for dimensionless values.
    pub symbol: &'static str,
}

impl TranslateResult {
    /// Returns `value * factor`.
    #[must_use]
    #[inline]
    pub fn scaled_value(&self) -> f64 {
        self.value * self.factor
    }

    /// Renders `"<number><symbol>"` with `precision` significant digits.
    ///
    /// Returns `None` if the scaled value is not finite.
    #[must_use]
    pub fn to_text(&self, precision: usize) -> Option<String> {
        let number = format_general(self.scaled_value(), precision)?;
        Some(format!("{number}{}", self.symbol))
    }
}

/// Translates an internally stored value into the display unit of `schema`.
///
/// ```rust
/// use understory_units::{Unit, UnitSchema, translate};
///
/// let tr = translate(UnitSchema::Si, 25.4, Unit::Length);
/// assert_eq!(tr.symbol, "mm");
/// assert_eq!(tr.to_text(3).as_deref(), Some("25.4mm"));
///
/// let tr = translate(UnitSchema::ImperialUk, 25.4, Unit::Length);
/// assert_eq!(tr.to_text(6).as_deref(), Some("1in"));
/// ```
#[must_use]
pub fn translate(schema: UnitSchema, value: f64, unit: Unit) -> TranslateResult {
    let symbol = schema.display_symbol(unit);
    let factor = find_symbol(symbol).map_or(1.0, |entry| 1.0 / entry.factor);
    TranslateResult {
        value,
        factor,
        symbol,
    }
}
