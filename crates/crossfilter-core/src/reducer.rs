// File: crates/crossfilter-core/src/reducer.rs
// Summary: Reducer trait (initial/add/remove triple) and the generic count and sum reducers.

use std::fmt;

use crate::record::Record;

/// Tolerant equality used when comparing incrementally maintained state with a
/// from-scratch aggregation. NaN compares equal to NaN.
pub trait ApproxEq {
    fn approx_eq(&self, other: &Self, eps: f64) -> bool;
}

impl ApproxEq for u64 {
    fn approx_eq(&self, other: &Self, _eps: f64) -> bool { self == other }
}

impl ApproxEq for f64 {
    fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        if self.is_nan() || other.is_nan() {
            return self.is_nan() && other.is_nan();
        }
        if self == other {
            return true;
        }
        let scale = self.abs().max(other.abs()).max(1.0);
        (self - other).abs() <= eps * scale
    }
}

/// Sum of float contributions that stays exactly invertible when some of them
/// are NaN or infinite.
///
/// Finite contributions are summed; non-finite ones are only counted. The sum
/// reads as NaN while at least one non-finite contribution is present, so
/// removing the offending record restores the finite total.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningSum {
    finite: f64,
    non_finite: u64,
}

impl RunningSum {
    #[must_use]
    pub fn add(mut self, v: f64) -> Self {
        if v.is_finite() {
            self.finite += v;
        } else {
            self.non_finite += 1;
        }
        self
    }

    #[must_use]
    pub fn remove(mut self, v: f64) -> Self {
        if v.is_finite() {
            self.finite -= v;
        } else {
            self.non_finite = self.non_finite.saturating_sub(1);
        }
        self
    }

    /// Current total, NaN while any non-finite contribution is held.
    pub fn value(&self) -> f64 {
        if self.non_finite > 0 { f64::NAN } else { self.finite }
    }

    /// Number of held contributions that were NaN or infinite.
    pub fn non_finite(&self) -> u64 { self.non_finite }
}

impl ApproxEq for RunningSum {
    fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        self.non_finite == other.non_finite && self.finite.approx_eq(&other.finite, eps)
    }
}

/// Aggregation semantics of a group: an explicit accumulator type plus three
/// pure transitions.
///
/// Contract: `remove(add(s, r), r)` equals `s` for every field, up to
/// floating-point rounding. `add` and `remove` must not panic for any record,
/// including ones carrying NaN.
pub trait Reducer: 'static {
    type State: Clone + fmt::Debug + PartialEq + ApproxEq + 'static;

    fn id(&self) -> &'static str;

    /// Zero state for a newly observed key.
    fn initial(&self) -> Self::State;

    /// `record` entered this key's active partition.
    fn add(&self, state: Self::State, record: &Record) -> Self::State;

    /// `record` left this key's active partition.
    fn remove(&self, state: Self::State, record: &Record) -> Self::State;
}

/// Number of active records per key.
#[derive(Clone, Copy, Debug, Default)]
pub struct CountReducer;

impl Reducer for CountReducer {
    type State = u64;

    fn id(&self) -> &'static str { "count" }
    fn initial(&self) -> u64 { 0 }
    fn add(&self, state: u64, _record: &Record) -> u64 { state + 1 }
    fn remove(&self, state: u64, _record: &Record) -> u64 { state.saturating_sub(1) }
}

/// Running sum of a per-record value. NaN values make the key's sum read NaN
/// only while the records carrying them are active.
pub struct SumReducer {
    id: &'static str,
    value: Box<dyn Fn(&Record) -> f64>,
}

impl SumReducer {
    pub fn new(id: &'static str, value: impl Fn(&Record) -> f64 + 'static) -> Self {
        Self { id, value: Box::new(value) }
    }

    /// Σ|close - open|.
    pub fn movement() -> Self {
        Self::new("monthly_move", Record::fluctuation)
    }

    /// Σ volume / `scale`.
    pub fn scaled_volume(scale: f64) -> Self {
        Self::new("scaled_volume", move |r| r.volume / scale)
    }

    /// Σ volume.
    pub fn volume() -> Self {
        Self::new("volume", |r| r.volume)
    }

    /// Value this reducer contributes for `record`.
    pub fn value_of(&self, record: &Record) -> f64 { (self.value)(record) }
}

impl fmt::Debug for SumReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SumReducer").field("id", &self.id).finish_non_exhaustive()
    }
}

impl Reducer for SumReducer {
    type State = RunningSum;

    fn id(&self) -> &'static str { self.id }
    fn initial(&self) -> RunningSum { RunningSum::default() }

    fn add(&self, state: RunningSum, record: &Record) -> RunningSum {
        state.add(self.value_of(record))
    }

    fn remove(&self, state: RunningSum, record: &Record) -> RunningSum {
        state.remove(self.value_of(record))
    }
}
