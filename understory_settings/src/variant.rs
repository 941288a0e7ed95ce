// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Values crossing the persistence boundary.

use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format used when a date-time has to be written as text.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// A value as stored in a [`KeyValueStore`](crate::KeyValueStore).
///
/// Quantities, enumeration items and colors are stored as [`Variant::Text`].
///
/// The `to_*` accessors are lenient the way text-based stores are: a store
/// that only keeps strings hands back `"true"` for a boolean, and a
/// one-element list may come back as plain text.
///
/// ```rust
/// use understory_settings::Variant;
///
/// assert_eq!(Variant::from("true").to_bool(), Some(true));
/// assert_eq!(Variant::from(3_i64).to_double(), Some(3.0));
/// assert_eq!(Variant::from(vec!["a".to_string()]).to_text().as_deref(), Some("a"));
/// assert_eq!(Variant::from("x").to_int(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// IEEE double.
    Double(f64),
    /// Opaque bytes.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
    /// Ordered list of texts.
    TextList(Vec<String>),
    /// Date and time without time zone.
    DateTime(NaiveDateTime),
}

impl Variant {
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
        }
    }

    /// Reads a boolean from a boolean, an integer or `"true"`/`"false"`/`"1"`/`"0"`.
    #[must_use]
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            Self::Int(v) => Some(*v != 0),
            _ => match self.to_text()?.trim() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
        }
    }

    /// Reads an integer from an integer, a boolean, an integral double or text.
    #[must_use]
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Bool(v) => Some(i64::from(*v)),
            // 2^63 is the first double above the i64 range; `as` would saturate.
            #[expect(clippy::cast_possible_truncation, reason = "range checked, round trip checked")]
            Self::Double(v) if (-I64_LIMIT..I64_LIMIT).contains(v) => {
                let truncated = *v as i64;
                (truncated as f64 == *v).then_some(truncated)
            }
            Self::Double(_) => None,
            _ => self.to_text()?.trim().parse().ok(),
        }
    }

    /// Reads a real from a double, an integer or text.
    #[must_use]
    pub fn to_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => self.to_text()?.trim().parse().ok(),
        }
    }

    /// Reads text. Scalars are formatted, a one-element list yields its
    /// element and bytes must be UTF-8.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Text(v) => Some(v.clone()),
            Self::TextList(v) if v.len() == 1 => Some(v[0].clone()),
            Self::TextList(_) => None,
            Self::Bool(v) => Some(v.to_string()),
            Self::Int(v) => Some(v.to_string()),
            Self::Double(v) => Some(v.to_string()),
            Self::Bytes(v) => core::str::from_utf8(v).ok().map(ToOwned::to_owned),
            Self::DateTime(v) => Some(v.format(DATE_TIME_FORMAT).to_string()),
        }
    }

    /// Reads a text list. Plain text becomes a one-element list.
    #[must_use]
    pub fn to_text_list(&self) -> Option<Vec<String>> {
        match self {
            Self::TextList(v) => Some(v.clone()),
            Self::Text(v) => Some(vec![v.clone()]),
            _ => None,
        }
    }

    /// Reads bytes. Text yields its UTF-8 encoding.
    #[must_use]
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Self::Bytes(v) => Some(v.clone()),
            Self::Text(v) => Some(v.clone().into_bytes()),
            _ => None,
        }
    }

    /// Reads a date-time, parsing ISO-8601 text such as `2021-03-04T05:06:07`.
    #[must_use]
    pub fn to_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(v) => Some(*v),
            _ => self.to_text()?.trim().parse().ok(),
        }
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Variant {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<Vec<u8>> for Variant {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Self::Text(v.into())
    }
}

impl From<Vec<String>> for Variant {
    fn from(v: Vec<String>) -> Self {
        Self::TextList(v)
    }
}

impl From<NaiveDateTime> for Variant {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn integral_doubles_read_as_int() {
        assert_eq!(Variant::Double(4.0).to_int(), Some(4));
        assert_eq!(Variant::Double(4.5).to_int(), None);
        assert_eq!(Variant::Text(" -12 ".into()).to_int(), Some(-12));
        assert_eq!(Variant::Bool(true).to_int(), Some(1));
    }

    #[test]
    fn doubles_outside_i64_are_not_ints() {
        assert_eq!(Variant::Double(9_223_372_036_854_775_808.0).to_int(), None);
        assert_eq!(Variant::Double(-9_223_372_036_854_775_808.0).to_int(), Some(i64::MIN));
        assert_eq!(Variant::Double(f64::INFINITY).to_int(), None);
        assert_eq!(Variant::Double(f64::NAN).to_int(), None);
        assert_eq!(Variant::Double(-1.0e300).to_int(), None);
    }

    #[test]
    fn bool_from_text_and_numbers() {
        assert_eq!(Variant::Text("false".into()).to_bool(), Some(false));
        assert_eq!(Variant::Int(2).to_bool(), Some(true));
        assert_eq!(Variant::Text("yes".into()).to_bool(), None);
        assert_eq!(Variant::TextList(Vec::new()).to_bool(), None);
    }

    #[test]
    fn date_time_text_round_trip() {
        let stamp = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_milli_opt(5, 6, 7, 250)
            .unwrap();
        let text = Variant::DateTime(stamp).to_text().unwrap();
        assert_eq!(text, "2021-03-04T05:06:07.250");
        assert_eq!(Variant::Text(text).to_date_time(), Some(stamp));
        assert_eq!(Variant::Text("yesterday".into()).to_date_time(), None);
    }

    #[test]
    fn lists_and_bytes() {
        assert_eq!(
            Variant::from("a").to_text_list(),
            Some(vec![String::from("a")])
        );
        assert_eq!(
            Variant::from(vec![String::from("a"), String::from("b")]).to_text(),
            None
        );
        assert_eq!(Variant::from("ab").to_bytes(), Some(b"ab".to_vec()));
        assert_eq!(Variant::Bytes(vec![0xff]).to_text(), None);
        assert_eq!(Variant::Int(1).to_text_list(), None);
    }
}
