// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unit dimensions, the unit symbol table, and [`Quantity`].
//!
//! Every dimension has exactly one *internal* unit. Quantities are always
//! stored in that unit; symbols only matter at the text boundary.
//!
//! | Dimension | Internal unit |
//! |-----------|---------------|
//! | Length    | mm            |
//! | Area      | mm²           |
//! | Volume    | mm³           |
//! | Mass      | kg            |
//! | Time      | s             |
//! | Angle     | rad           |
//! | Velocity  | mm/s          |
//! | Density   | kg/m³         |
//! | Pressure  | kPa           |

use core::f64::consts::PI;
use core::fmt;

use crate::QuantityParseError;

/// Physical dimension of a quantity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    /// Dimensionless.
    #[default]
    None,
    /// Length, stored in millimetres.
    Length,
    /// Area, stored in square millimetres.
    Area,
    /// Volume, stored in cubic millimetres.
    Volume,
    /// Mass, stored in kilograms.
    Mass,
    /// Time, stored in seconds.
    Time,
    /// Plane angle, stored in radians.
    Angle,
    /// Velocity, stored in millimetres per second.
    Velocity,
    /// Density, stored in kilograms per cubic metre.
    Density,
    /// Pressure, stored in kilopascals.
    Pressure,
}

impl Unit {
    /// Returns the human-readable dimension name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Length => "Length",
            Self::Area => "Area",
            Self::Volume => "Volume",
            Self::Mass => "Mass",
            Self::Time => "Time",
            Self::Angle => "Angle",
            Self::Velocity => "Velocity",
            Self::Density => "Density",
            Self::Pressure => "Pressure",
        }
    }

    /// Returns the symbol of the internal unit for this dimension.
    #[must_use]
    pub const fn internal_symbol(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Length => "mm",
            Self::Area => "mm²",
            Self::Volume => "mm³",
            Self::Mass => "kg",
            Self::Time => "s",
            Self::Angle => "rad",
            Self::Velocity => "mm/s",
            Self::Density => "kg/m³",
            Self::Pressure => "kPa",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the unit symbol table.
///
/// `factor` converts a value expressed in `symbol` into the internal unit of
/// `unit`: `internal = value * factor`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UnitSymbol {
    /// Text symbol, as written after a number.
    pub symbol: &'static str,
    /// Dimension of the symbol.
    pub unit: Unit,
    /// Multiplier into the internal unit.
    pub factor: f64,
}

const fn entry(symbol: &'static str, unit: Unit, factor: f64) -> UnitSymbol {
    UnitSymbol {
        symbol,
        unit,
        factor,
    }
}

const DEGREE: f64 = PI / 180.0;
const INCH: f64 = 25.4;
const FOOT: f64 = 304.8;
const POUND: f64 = 0.453_592_37;

/// Every symbol `parse_quantity` understands.
pub(crate) const SYMBOLS: &[UnitSymbol] = &[
    // Length
    entry("nm", Unit::Length, 1e-6),
    entry("µm", Unit::Length, 1e-3),
    entry("um", Unit::Length, 1e-3),
    entry("mm", Unit::Length, 1.0),
    entry("cm", Unit::Length, 10.0),
    entry("dm", Unit::Length, 100.0),
    entry("m", Unit::Length, 1000.0),
    entry("km", Unit::Length, 1e6),
    entry("thou", Unit::Length, INCH / 1000.0),
    entry("in", Unit::Length, INCH),
    entry("\"", Unit::Length, INCH),
    entry("ft", Unit::Length, FOOT),
    entry("'", Unit::Length, FOOT),
    entry("yd", Unit::Length, 914.4),
    entry("mi", Unit::Length, 1_609_344.0),
    // Area
    entry("mm²", Unit::Area, 1.0),
    entry("mm^2", Unit::Area, 1.0),
    entry("cm²", Unit::Area, 100.0),
    entry("cm^2", Unit::Area, 100.0),
    entry("m²", Unit::Area, 1e6),
    entry("m^2", Unit::Area, 1e6),
    entry("km²", Unit::Area, 1e12),
    entry("km^2", Unit::Area, 1e12),
    entry("in²", Unit::Area, INCH * INCH),
    entry("in^2", Unit::Area, INCH * INCH),
    entry("ft²", Unit::Area, FOOT * FOOT),
    entry("ft^2", Unit::Area, FOOT * FOOT),
    // Volume
    entry("mm³", Unit::Volume, 1.0),
    entry("mm^3", Unit::Volume, 1.0),
    entry("cm³", Unit::Volume, 1e3),
    entry("cm^3", Unit::Volume, 1e3),
    entry("mL", Unit::Volume, 1e3),
    entry("L", Unit::Volume, 1e6),
    entry("m³", Unit::Volume, 1e9),
    entry("m^3", Unit::Volume, 1e9),
    entry("in³", Unit::Volume, INCH * INCH * INCH),
    entry("in^3", Unit::Volume, INCH * INCH * INCH),
    entry("ft³", Unit::Volume, FOOT * FOOT * FOOT),
    entry("ft^3", Unit::Volume, FOOT * FOOT * FOOT),
    // Mass
    entry("mg", Unit::Mass, 1e-6),
    entry("g", Unit::Mass, 1e-3),
    entry("kg", Unit::Mass, 1.0),
    entry("t", Unit::Mass, 1000.0),
    entry("oz", Unit::Mass, POUND / 16.0),
    entry("lb", Unit::Mass, POUND),
    // Time
    entry("ms", Unit::Time, 1e-3),
    entry("s", Unit::Time, 1.0),
    entry("min", Unit::Time, 60.0),
    entry("h", Unit::Time, 3600.0),
    // Angle
    entry("rad", Unit::Angle, 1.0),
    entry("mrad", Unit::Angle, 1e-3),
    entry("°", Unit::Angle, DEGREE),
    entry("deg", Unit::Angle, DEGREE),
    // Velocity
    entry("mm/s", Unit::Velocity, 1.0),
    entry("m/s", Unit::Velocity, 1000.0),
    entry("km/h", Unit::Velocity, 1e6 / 3600.0),
    entry("in/s", Unit::Velocity, INCH),
    entry("ft/s", Unit::Velocity, FOOT),
    entry("mph", Unit::Velocity, 1_609_344.0 / 3600.0),
    // Density
    entry("kg/m³", Unit::Density, 1.0),
    entry("kg/m^3", Unit::Density, 1.0),
    entry("g/cm³", Unit::Density, 1000.0),
    entry("g/cm^3", Unit::Density, 1000.0),
    entry("lb/ft³", Unit::Density, POUND / (FOOT * FOOT * FOOT * 1e-9)),
    entry("lb/ft^3", Unit::Density, POUND / (FOOT * FOOT * FOOT * 1e-9)),
    // Pressure
    entry("Pa", Unit::Pressure, 1e-3),
    entry("kPa", Unit::Pressure, 1.0),
    entry("MPa", Unit::Pressure, 1e3),
    entry("GPa", Unit::Pressure, 1e6),
    entry("bar", Unit::Pressure, 100.0),
    entry("psi", Unit::Pressure, 6.894_757_293_168_361),
];

/// Looks up a unit symbol. Symbols are case-sensitive (`mm` is not `Mm`).
#[must_use]
pub fn find_symbol(symbol: &str) -> Option<&'static UnitSymbol> {
    SYMBOLS.iter().find(|entry| entry.symbol == symbol)
}

/// Returns every known symbol of the given dimension.
pub fn symbols_of(unit: Unit) -> impl Iterator<Item = &'static UnitSymbol> {
    SYMBOLS.iter().filter(move |entry| entry.unit == unit)
}

/// A scalar value tagged with its dimension.
///
/// The value is always expressed in the internal unit of [`Quantity::unit`].
///
/// ```rust
/// use understory_units::{Quantity, Unit};
///
/// let q = Quantity::from_symbol(2.0, "in").unwrap();
/// assert_eq!(q.unit(), Unit::Length);
/// assert_eq!(q.value(), 50.8);
/// assert_eq!(q.convert_to("in").unwrap(), 2.0);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantity {
    value: f64,
    unit: Unit,
}

impl Quantity {
    /// Creates a quantity from a value already in the internal unit.
    #[must_use]
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Creates a length from millimetres.
    #[must_use]
    pub const fn millimeters(value: f64) -> Self {
        Self::new(value, Unit::Length)
    }

    /// Creates an angle from radians.
    #[must_use]
    pub const fn radians(value: f64) -> Self {
        Self::new(value, Unit::Angle)
    }

    /// Creates an angle from degrees.
    #[must_use]
    pub const fn degrees(value: f64) -> Self {
        Self::new(value * DEGREE, Unit::Angle)
    }

    /// Creates a quantity from a value expressed in `symbol`.
    pub fn from_symbol(value: f64, symbol: &str) -> Result<Self, QuantityParseError> {
        let entry = find_symbol(symbol)
            .ok_or_else(|| QuantityParseError::UnknownUnit(symbol.into()))?;
        Ok(Self::new(value * entry.factor, entry.unit))
    }

    /// Returns the value in the internal unit.
    #[must_use]
    #[inline]
    pub const fn value(self) -> f64 {
        self.value
    }

    /// Returns the dimension.
    #[must_use]
    #[inline]
    pub const fn unit(self) -> Unit {
        self.unit
    }

    /// Expresses this quantity in another unit of the same dimension.
    pub fn convert_to(self, symbol: &str) -> Result<f64, QuantityParseError> {
        let entry = find_symbol(symbol)
            .ok_or_else(|| QuantityParseError::UnknownUnit(symbol.into()))?;
        if entry.unit != self.unit {
            return Err(QuantityParseError::DimensionMismatch {
                expected: self.unit,
                found: entry.unit,
            });
        }
        Ok(self.value / entry.factor)
    }
}
