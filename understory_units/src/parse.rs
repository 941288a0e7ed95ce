// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quantity text parsing.

use crate::QuantityParseError;
use crate::unit::{Unit, find_symbol};

/// Result of [`parse_quantity`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParsedQuantity {
    /// The number as written.
    pub value: f64,
    /// Multiplier from the written unit into the internal unit.
    pub factor: f64,
    /// The symbol as found in the unit table, empty when none was written.
    pub symbol: &'static str,
    /// Dimension of the symbol, [`Unit::None`] when none was written.
    pub unit: Unit,
}

impl ParsedQuantity {
    /// Returns the parsed value converted into the internal unit.
    #[must_use]
    #[inline]
    pub fn internal_value(&self) -> f64 {
        self.value * self.factor
    }

    /// Returns `true` if the text carried a unit symbol.
    #[must_use]
    #[inline]
    pub fn has_unit(&self) -> bool {
        self.unit != Unit::None
    }
}

/// Parses `"<number><optional unit symbol>"`.
///
/// The number always uses `.` as decimal separator and may carry a sign and a
/// decimal exponent. Whitespace is allowed around the number and the symbol.
/// Without a symbol the unit is [`Unit::None`] and the caller decides which
/// unit applies.
///
/// ```rust
/// use understory_units::{Unit, parse_quantity};
///
/// let q = parse_quantity("1in").unwrap();
/// assert_eq!(q.unit, Unit::Length);
/// assert_eq!(q.internal_value(), 25.4);
///
/// let q = parse_quantity(" -2.5e1 ").unwrap();
/// assert_eq!(q.unit, Unit::None);
/// assert_eq!(q.internal_value(), -25.0);
///
/// assert!(parse_quantity("1,5mm").is_err());
/// assert!(parse_quantity("12 parsecs").is_err());
/// ```
pub fn parse_quantity(text: &str) -> Result<ParsedQuantity, QuantityParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(QuantityParseError::Empty);
    }

    let end = number_prefix_len(text.as_bytes());
    if end == 0 {
        return Err(QuantityParseError::InvalidNumber(text.into()));
    }
    let (number, rest) = text.split_at(end);
    let value: f64 = number
        .parse()
        .map_err(|_| QuantityParseError::InvalidNumber(number.into()))?;

    let symbol = rest.trim();
    if symbol.is_empty() {
        return Ok(ParsedQuantity {
            value,
            factor: 1.0,
            symbol: "",
            unit: Unit::None,
        });
    }

    let entry = find_symbol(symbol).ok_or_else(|| QuantityParseError::UnknownUnit(symbol.into()))?;
    Ok(ParsedQuantity {
        value,
        factor: entry.factor,
        symbol: entry.symbol,
        unit: entry.unit,
    })
}

/// Returns the byte length of the leading decimal number, 0 if there is none.
fn number_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_end = digits_from(i);
    let mut digit_count = int_end - i;
    i = int_end;
    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        digit_count += frac_end - (i + 1);
        i = frac_end;
    }
    if digit_count == 0 {
        return 0;
    }

    // An exponent only counts when digits follow it.
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }
    i
}
