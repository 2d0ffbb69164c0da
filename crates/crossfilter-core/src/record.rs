// File: crates/crossfilter-core/src/record.rs
// Summary: Daily index record (date, open, close, volume) with load-time derived fields.
// Notes:
// - Numeric fields are never validated. A value that failed coercion is NaN; the
//   sums it feeds read NaN while the record is active and recover once it leaves.
//   Sanitizing it for display is up to the display layer.

use chrono::{Datelike, NaiveDate};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    /// First day of `date`'s month, computed once at construction.
    pub month: NaiveDate,
    pub open: f64,
    pub close: f64,
    /// Traded volume in whole shares.
    ///
    /// Held as `f64` rather than an integer so an unparsable volume can carry the
    /// same NaN marker as `open` and `close`. Whole-share volumes sum exactly up
    /// to 2^53 shares.
    pub volume: f64,
}

impl Record {
    pub fn new(date: NaiveDate, open: f64, close: f64, volume: f64) -> Self {
        let month = date.with_day(1).unwrap_or(date);
        Self { date, month, open, close, volume }
    }

    /// Build a record from raw text fields, coercing each numeric to `f64`.
    pub fn from_text(date: NaiveDate, open: &str, close: &str, volume: &str) -> Self {
        Self::new(date, coerce(open), coerce(close), coerce(volume))
    }

    /// Signed daily move (`close - open`).
    #[inline]
    pub fn change(&self) -> f64 { self.close - self.open }

    /// Unsigned daily move.
    #[inline]
    pub fn fluctuation(&self) -> f64 { self.change().abs() }

    /// Midpoint of open and close, the "index level" of the day.
    #[inline]
    pub fn mid(&self) -> f64 { (self.open + self.close) / 2.0 }

    /// Daily move as a percentage of the open.
    #[inline]
    pub fn percent_change(&self) -> f64 { self.change() / self.open * 100.0 }

    #[inline]
    pub fn is_loss(&self) -> bool { self.open > self.close }
}

/// Numeric coercion used at ingestion: trimmed parse, NaN on failure.
pub fn coerce(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}
