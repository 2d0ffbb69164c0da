// File: crates/crossfilter-core/src/keys.rs
// Summary: Pure key projections used by the stock dashboard dimensions.

use chrono::Datelike;

use crate::key::Key;
use crate::record::Record;

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// How zero-based month indices map onto quarter labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QuarterConvention {
    /// `[0,2] -> Q1`, `[3,5] -> Q2`, `[6,8] -> Q3`, `[9,11] -> Q4`.
    #[default]
    Calendar,
    /// Historical dashboard boundaries: month index 3 (April) falls through to `Q4`.
    Legacy,
}

/// Calendar year.
pub fn year(r: &Record) -> Key {
    Key::Int(r.date.year() as i64)
}

/// Full trading date.
pub fn date(r: &Record) -> Key {
    Key::Date(r.date)
}

/// First day of the month (precomputed on the record).
pub fn month(r: &Record) -> Key {
    Key::Date(r.month)
}

pub fn quarter(r: &Record, convention: QuarterConvention) -> Key {
    Key::from(quarter_label(r.date.month0(), convention))
}

/// Quarter label for a zero-based month index.
pub fn quarter_label(month0: u32, convention: QuarterConvention) -> &'static str {
    match convention {
        QuarterConvention::Calendar => match month0 {
            0..=2 => "Q1",
            3..=5 => "Q2",
            6..=8 => "Q3",
            _ => "Q4",
        },
        QuarterConvention::Legacy => {
            if month0 <= 2 {
                "Q1"
            } else if month0 > 3 && month0 <= 5 {
                "Q2"
            } else if month0 > 5 && month0 <= 8 {
                "Q3"
            } else {
                "Q4"
            }
        }
    }
}

/// Weekday index (Sunday = 0) joined with its short name, e.g. `"1.Mon"`.
pub fn day_of_week(r: &Record) -> Key {
    let day = r.date.weekday().num_days_from_sunday() as usize;
    Key::Text(format!("{}.{}", day, WEEKDAY_NAMES[day]))
}

/// `"Loss"` when the day closed below its open, otherwise `"Gain"`.
pub fn gain_or_loss(r: &Record) -> Key {
    Key::from(if r.is_loss() { "Loss" } else { "Gain" })
}

/// Daily percentage change rounded to a whole percent.
pub fn fluctuation_bucket(r: &Record) -> Key {
    Key::rounded(r.percent_change())
}
