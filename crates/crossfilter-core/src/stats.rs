// File: crates/crossfilter-core/src/stats.rs
// Summary: Running-statistic reducers: yearly performance and monthly index average.
// Notes:
// - Only the base sums are updated incrementally. Ratios are recomputed from them
//   after every transition, and a partition whose count drops to zero snaps back
//   to the zero state so no division by zero or residual rounding survives.
// - Base sums are `RunningSum`s: a NaN record turns the affected fields NaN only
//   while it is inside the partition.

use crate::key::round_half_up;
use crate::record::Record;
use crate::reducer::{ApproxEq, Reducer, RunningSum};

/// `part / whole * 100`, or 0 when `whole` is zero.
#[inline]
fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole * 100.0 }
}

/// Per-year performance of the index.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Performance {
    pub count: u64,
    /// Σ(close - open).
    pub abs_gain: f64,
    /// Σ|close - open|.
    pub fluctuation: f64,
    /// Σ(open + close) / 2.
    pub sum_index: f64,
    pub avg_index: f64,
    pub percentage_gain: f64,
    pub fluctuation_percentage: f64,
    gain_sum: RunningSum,
    fluctuation_sum: RunningSum,
    index_sum: RunningSum,
}

impl Performance {
    fn refresh(mut self) -> Self {
        if self.count == 0 {
            return Self::default();
        }
        self.abs_gain = self.gain_sum.value();
        self.fluctuation = self.fluctuation_sum.value();
        self.sum_index = self.index_sum.value();
        self.avg_index = self.sum_index / self.count as f64;
        self.percentage_gain = percent_of(self.abs_gain, self.avg_index);
        self.fluctuation_percentage = percent_of(self.fluctuation, self.avg_index);
        self
    }
}

impl ApproxEq for Performance {
    fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.count == other.count
            && self.abs_gain.approx_eq(&other.abs_gain, eps)
            && self.fluctuation.approx_eq(&other.fluctuation, eps)
            && self.sum_index.approx_eq(&other.sum_index, eps)
            && self.avg_index.approx_eq(&other.avg_index, eps)
            && self.percentage_gain.approx_eq(&other.percentage_gain, eps)
            && self.fluctuation_percentage.approx_eq(&other.fluctuation_percentage, eps)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct YearlyPerformance;

impl Reducer for YearlyPerformance {
    type State = Performance;

    fn id(&self) -> &'static str { "yearly_performance" }

    fn initial(&self) -> Performance { Performance::default() }

    fn add(&self, mut s: Performance, r: &Record) -> Performance {
        s.count += 1;
        s.gain_sum = s.gain_sum.add(r.change());
        s.fluctuation_sum = s.fluctuation_sum.add(r.fluctuation());
        s.index_sum = s.index_sum.add(r.mid());
        s.refresh()
    }

    fn remove(&self, mut s: Performance, r: &Record) -> Performance {
        s.count = s.count.saturating_sub(1);
        s.gain_sum = s.gain_sum.remove(r.change());
        s.fluctuation_sum = s.fluctuation_sum.remove(r.fluctuation());
        s.index_sum = s.index_sum.remove(r.mid());
        s.refresh()
    }
}

/// Average index level over the days of a month.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IndexAverage {
    pub days: u64,
    /// Σ(open + close) / 2.
    pub total: f64,
    /// `total / days` rounded half-up; 0 for an empty month.
    pub avg: f64,
    sum: RunningSum,
}

impl IndexAverage {
    fn refresh(mut self) -> Self {
        if self.days == 0 {
            return Self::default();
        }
        self.total = self.sum.value();
        self.avg = round_half_up(self.total / self.days as f64);
        self
    }
}

impl ApproxEq for IndexAverage {
    fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.days == other.days
            && self.total.approx_eq(&other.total, eps)
            && (self.avg.approx_eq(&other.avg, eps) || self.straddles_tie(other, eps))
    }
}

impl IndexAverage {
    /// Totals that agree within `eps` can still round to neighbouring integers
    /// when the mean sits on a .5 boundary.
    fn straddles_tie(&self, other: &Self, eps: f64) -> bool {
        let mean = self.total / self.days as f64;
        (self.avg - other.avg).abs() == 1.0
            && (mean - mean.floor() - 0.5).abs() <= eps * mean.abs().max(1.0)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MonthlyIndexAverage;

impl Reducer for MonthlyIndexAverage {
    type State = IndexAverage;

    fn id(&self) -> &'static str { "index_average" }

    fn initial(&self) -> IndexAverage { IndexAverage::default() }

    fn add(&self, mut s: IndexAverage, r: &Record) -> IndexAverage {
        s.days += 1;
        s.sum = s.sum.add(r.mid());
        s.refresh()
    }

    fn remove(&self, mut s: IndexAverage, r: &Record) -> IndexAverage {
        s.days = s.days.saturating_sub(1);
        s.sum = s.sum.remove(r.mid());
        s.refresh()
    }
}
