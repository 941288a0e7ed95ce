// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Units: physical quantities and their text form.
//!
//! Values with a physical dimension are stored as a [`Quantity`]: a number in
//! the fixed *internal* unit of a [`Unit`] dimension (millimetres for lengths,
//! radians for angles, ...). Text only appears at the edges:
//!
//! - [`translate`] maps an internal value to the display unit of a
//!   [`UnitSchema`] (SI or imperial), and [`TranslateResult::to_text`] renders it
//!   as `"<number><symbol>"`.
//! - [`parse_quantity`] reads such text back, resolving the symbol against the
//!   complete symbol table and reporting the dimension it belongs to.
//!
//! Both directions are locale-independent: the decimal separator is always `.`.
//! Parsing never guesses; malformed numbers and unknown symbols are errors.
//!
//! ```rust
//! use understory_units::{Unit, UnitSchema, parse_quantity, translate};
//!
//! let shown = translate(UnitSchema::Si, 25.4, Unit::Length);
//! assert_eq!(shown.to_text(6).as_deref(), Some("25.4mm"));
//!
//! let parsed = parse_quantity("1in").unwrap();
//! assert_eq!(parsed.unit, Unit::Length);
//! assert_eq!(parsed.internal_value(), 25.4);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod format;
mod parse;
mod schema;
mod unit;

use alloc::string::String;

pub use format::format_general;
pub use parse::{ParsedQuantity, parse_quantity};
pub use schema::{TranslateResult, UnitSchema, translate};
pub use unit::{Quantity, Unit, UnitSymbol, find_symbol, symbols_of};

/// Errors from quantity parsing and unit conversion.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QuantityParseError {
    /// The text was empty or whitespace.
    #[error("empty quantity text")]
    Empty,
    /// The text does not start with a decimal number.
    #[error("malformed number '{0}'")]
    InvalidNumber(String),
    /// The symbol after the number is not a known unit.
    #[error("unknown unit symbol '{0}'")]
    UnknownUnit(String),
    /// A unit of another dimension was requested.
    #[error("expected a {expected} unit, found a {found} unit")]
    DimensionMismatch {
        /// Dimension of the quantity.
        expected: Unit,
        /// Dimension of the requested symbol.
        found: Unit,
    },
}
