// File: crates/crossfilter-core/src/types.rs
// Summary: Shared handle types and constants (dimension limit, volume scale).

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

/// Maximum number of dimensions per aggregator.
/// Contract: each dimension owns one bit of the per-record rejection mask.
pub const MAX_DIMENSIONS: usize = u64::BITS as usize;

/// Default divisor applied to daily volume for the monthly volume chart.
pub const VOLUME_SCALE: f64 = 500_000.0;

/// Identity of one aggregator instance. Handles carry it so that a handle minted
/// by another instance is rejected rather than indexing the wrong dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AggregatorId(u64);

impl AggregatorId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to a dimension registered on an [`Aggregator`](crate::Aggregator).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DimensionId {
    pub(crate) owner: AggregatorId,
    pub(crate) index: usize,
}

impl DimensionId {
    /// Registration order of the dimension within its aggregator.
    pub const fn index(&self) -> usize { self.index }
}

/// Typed handle to a group; `R` is the reducer that defines the group's state.
pub struct GroupHandle<R> {
    pub(crate) owner: AggregatorId,
    pub(crate) index: usize,
    _reducer: PhantomData<fn() -> R>,
}

impl<R> GroupHandle<R> {
    pub(crate) const fn new(owner: AggregatorId, index: usize) -> Self {
        Self { owner, index, _reducer: PhantomData }
    }

    /// Registration order of the group within its aggregator.
    pub const fn index(&self) -> usize { self.index }
}

// Manual impls: derives would demand the same traits from `R`.
impl<R> Clone for GroupHandle<R> {
    fn clone(&self) -> Self { *self }
}

impl<R> Copy for GroupHandle<R> {}

impl<R> PartialEq for GroupHandle<R> {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.index == other.index
    }
}

impl<R> Eq for GroupHandle<R> {}

impl<R> fmt::Debug for GroupHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupHandle")
            .field("owner", &self.owner)
            .field("index", &self.index)
            .finish()
    }
}

/// Records entering and leaving the active set as the result of one filter change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterDelta {
    pub added: usize,
    pub removed: usize,
}

impl FilterDelta {
    /// True when no record changed membership.
    pub const fn is_empty(&self) -> bool { self.added == 0 && self.removed == 0 }

    pub(crate) fn merge(&mut self, other: FilterDelta) {
        self.added += other.added;
        self.removed += other.removed;
    }
}
