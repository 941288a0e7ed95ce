// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locale-independent number rendering.

use alloc::format;
use alloc::string::String;

const MAX_PRECISION: usize = 17;

/// Renders `value` with `precision` significant digits, `%g` style.
///
/// Trailing zeros of the fraction are dropped. Scientific notation is used when
/// the decimal exponent is below -4 or not below `precision`. A `precision` of
/// zero is treated as one, and anything above 17 as 17, which is enough for any
/// `f64`. The decimal separator is always `.`.
///
/// Returns `None` for NaN and infinities, which have no parseable form.
///
/// ```rust
/// use understory_units::format_general;
///
/// assert_eq!(format_general(25.4, 6).as_deref(), Some("25.4"));
/// assert_eq!(format_general(1.0 / 3.0, 3).as_deref(), Some("0.333"));
/// assert_eq!(format_general(1e20, 6).as_deref(), Some("1e+20"));
/// assert_eq!(format_general(f64::NAN, 6), None);
/// ```
#[must_use]
pub fn format_general(value: f64, precision: usize) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some(String::from("0"));
    }
    let precision = precision.clamp(1, MAX_PRECISION);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = scientific.split_once('e')?;
    let exponent: i32 = exponent.parse().ok()?;
    let max_exponent = i32::try_from(precision).unwrap_or(i32::MAX);

    if exponent < -4 || exponent >= max_exponent {
        let sign = if exponent < 0 { '-' } else { '+' };
        return Some(format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        ));
    }

    let decimals = usize::try_from(max_exponent - 1 - exponent).unwrap_or(0);
    let fixed = format!("{value:.decimals$}");
    Some(String::from(trim_fraction(&fixed)))
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
