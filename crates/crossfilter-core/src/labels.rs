// File: crates/crossfilter-core/src/labels.rs
// Summary: Chart-facing accessors and label formatters; filter context is passed explicitly.

use chrono::{Datelike, NaiveDate};

use crate::aggregator::Aggregator;
use crate::error::Result;
use crate::key::Key;
use crate::record::Record;
use crate::stats::Performance;
use crate::types::DimensionId;

/// What a label callback may ask about the current filter state.
pub trait FilterContext {
    fn has_filter(&self, dim: DimensionId) -> Result<bool>;
    /// Whether `dim`'s filter (if any) accepts `key`.
    fn filter_accepts(&self, dim: DimensionId, key: &Key) -> Result<bool>;
    fn active_count(&self) -> usize;
}

impl FilterContext for Aggregator {
    fn has_filter(&self, dim: DimensionId) -> Result<bool> {
        Ok(self.dimension(dim)?.has_filter())
    }

    fn filter_accepts(&self, dim: DimensionId, key: &Key) -> Result<bool> {
        Ok(self.dimension(dim)?.accepts(key))
    }

    fn active_count(&self) -> usize {
        Aggregator::active_count(self)
    }
}

/// Pie slice label: `"Gain(63%)"`, share of the active set rounded down.
/// A slice excluded by the pie's own filter reads `"Loss(0%)"`.
pub fn gain_or_loss_label(ctx: &impl FilterContext, dim: DimensionId, key: &Key, count: u64) -> Result<String> {
    if ctx.has_filter(dim)? && !ctx.filter_accepts(dim, key)? {
        return Ok(format!("{key}(0%)"));
    }
    let total = ctx.active_count();
    let pct = if total == 0 { 0 } else { (count as f64 / total as f64 * 100.0).floor() as u64 };
    Ok(format!("{key}({pct}%)"))
}

/// Bubble chart coordinates for one year.
#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: f64,
}

impl Bubble {
    pub fn new(key: &Key, p: &Performance) -> Self {
        Self {
            label: key.to_string(),
            x: p.abs_gain,
            y: p.percentage_gain,
            radius: p.fluctuation_percentage,
            color: p.abs_gain,
        }
    }
}

/// Bubble tooltip, one fact per line.
pub fn bubble_title(key: &Key, p: &Performance) -> String {
    [
        key.to_string(),
        format!("Index Gain: {:.2}", p.abs_gain),
        format!("Index Gain in Percentage: {:.2}%", p.percentage_gain),
        format!("Fluctuation / Index Ratio: {:.2}%", p.fluctuation_percentage),
    ]
    .join("\n")
}

/// Readout for a brushed fluctuation range, e.g. `"-1.00% -> 2.00%"`.
pub fn fluctuation_filter_label(lo: f64, hi: f64) -> String {
    format!("{lo:.2}% -> {hi:.2}%")
}

/// Fluctuation axis tick, e.g. `"-3%"`.
pub fn percent_tick(v: i64) -> String {
    format!("{v}%")
}

/// Move chart tooltip: month then value; a NaN value reads as 0.
pub fn move_chart_title(month: NaiveDate, value: f64) -> String {
    let value = if value.is_nan() { 0.0 } else { value };
    format!("{}\n{:.2}", month.format("%m/%d/%Y"), value)
}

/// Day-of-week row label: the name part of `"1.Mon"`.
pub fn day_of_week_label(key: &Key) -> &str {
    match key.as_text() {
        Some(text) => text.split_once('.').map_or(text, |(_, name)| name),
        None => "",
    }
}

/// Data table section header, e.g. `"2001/07"`.
pub fn table_group_label(record: &Record) -> String {
    format!("{}/{:02}", record.date.year(), record.date.month())
}
