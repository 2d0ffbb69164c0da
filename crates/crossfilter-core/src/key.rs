// File: crates/crossfilter-core/src/key.rs
// Summary: Totally ordered dimension key.

use chrono::NaiveDate;
use std::fmt;

/// Value a dimension projects each record to.
///
/// Ordering is by variant first (`Invalid < Int < Date < Text`), then by value,
/// so range filters over one kind of key never pick up keys of another kind.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Numeric projection that was not finite (e.g. a percentage over a zero open).
    Invalid,
    Int(i64),
    Date(NaiveDate),
    Text(String),
}

impl Key {
    /// Round `v` half-up to an integer key; non-finite values become [`Key::Invalid`].
    pub fn rounded(v: f64) -> Self {
        if v.is_finite() { Key::Int(round_half_up(v) as i64) } else { Key::Invalid }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self { Key::Int(v) => Some(*v), _ => None }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self { Key::Date(d) => Some(*d), _ => None }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self { Key::Text(s) => Some(s.as_str()), _ => None }
    }
}

/// Round to nearest integer with ties towards +infinity (`-2.5 -> -2`, `2.5 -> 3`).
#[inline]
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

impl From<i64> for Key {
    fn from(v: i64) -> Self { Key::Int(v) }
}

impl From<i32> for Key {
    fn from(v: i32) -> Self { Key::Int(v as i64) }
}

impl From<NaiveDate> for Key {
    fn from(d: NaiveDate) -> Self { Key::Date(d) }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self { Key::Text(s.to_string()) }
}

impl From<String> for Key {
    fn from(s: String) -> Self { Key::Text(s) }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Invalid => f.write_str("NaN"),
            Key::Int(v) => write!(f, "{v}"),
            Key::Date(d) => write!(f, "{}", d.format("%m/%d/%Y")),
            Key::Text(s) => f.write_str(s),
        }
    }
}
