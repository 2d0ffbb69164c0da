// File: crates/crossfilter-core/src/aggregator.rs
// Summary: Aggregator owning records, dimensions and groups; applies filter deltas incrementally.

use std::any::type_name;
use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::dimension::Dimension;
use crate::error::{CrossfilterError, HandleKind, Result};
use crate::filter::Filter;
use crate::group::{Group, GroupScope, GroupSlot};
use crate::key::Key;
use crate::record::Record;
use crate::reducer::Reducer;
use crate::types::{AggregatorId, DimensionId, FilterDelta, GroupHandle, MAX_DIMENSIONS};

/// Owns the dataset and every dimension/group built over it.
///
/// A record is *active* when no dimension's filter rejects it. Each record carries
/// a bitmask with one bit per rejecting dimension, so a filter change only has to
/// flip bits for the records under keys whose verdict changed and replay those
/// records through the groups.
pub struct Aggregator {
    id: AggregatorId,
    records: Vec<Record>,
    rejected: Vec<u64>,
    active: usize,
    dimensions: Vec<Dimension>,
    groups: Vec<Box<dyn GroupSlot>>,
}

impl Aggregator {
    pub fn new(records: Vec<Record>) -> Self {
        let n = records.len();
        Self {
            id: AggregatorId::next(),
            records,
            rejected: vec![0; n],
            active: n,
            dimensions: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn records(&self) -> &[Record] { &self.records }

    pub fn record(&self, id: usize) -> Option<&Record> { self.records.get(id) }

    /// Register a dimension. Keys are computed once here and never again.
    pub fn create_dimension(
        &mut self,
        name: impl Into<String>,
        key_fn: impl Fn(&Record) -> Key,
    ) -> Result<DimensionId> {
        let position = self.dimensions.len();
        if position >= MAX_DIMENSIONS {
            return Err(CrossfilterError::TooManyDimensions { max: MAX_DIMENSIONS });
        }
        let dimension = Dimension::new(name, position, &self.records, key_fn);
        debug!(dimension = dimension.name(), keys = dimension.keys().count(), "dimension registered");
        self.dimensions.push(dimension);
        Ok(DimensionId { owner: self.id, index: position })
    }

    pub fn dimension(&self, dim: DimensionId) -> Result<&Dimension> {
        let index = self.dimension_index(dim)?;
        Ok(&self.dimensions[index])
    }

    /// Group observing every filter (the active set).
    pub fn create_group<R: Reducer>(&mut self, dim: DimensionId, reducer: R) -> Result<GroupHandle<R>> {
        self.create_group_with_scope(dim, reducer, GroupScope::AllFilters)
    }

    pub fn create_group_with_scope<R: Reducer>(
        &mut self,
        dim: DimensionId,
        reducer: R,
        scope: GroupScope,
    ) -> Result<GroupHandle<R>> {
        let d = self.dimension_index(dim)?;
        let dimension = &self.dimensions[d];
        let mut group = Group::new(reducer, d, dimension.bit(), scope);
        group.rebuild(&self.records, &self.rejected, dimension);
        debug!(group = group.id(), dimension = dimension.name(), ?scope, "group registered");
        let index = self.groups.len();
        self.groups.push(Box::new(group));
        Ok(GroupHandle::new(self.id, index))
    }

    pub fn group<R: Reducer>(&self, handle: GroupHandle<R>) -> Result<&Group<R>> {
        let index = self.group_index(handle.owner, handle.index)?;
        let slot = &self.groups[index];
        slot.as_any().downcast_ref::<Group<R>>().ok_or(CrossfilterError::GroupTypeMismatch {
            index,
            expected: type_name::<R>(),
            found: slot.reducer_id(),
        })
    }

    /// Replace `dim`'s filter (`None` clears it) and replay the resulting
    /// membership changes through every group.
    pub fn set_filter(&mut self, dim: DimensionId, filter: Option<Filter>) -> Result<FilterDelta> {
        let d = self.dimension_index(dim)?;
        let bit = self.dimensions[d].bit();
        let flips = self.dimensions[d].retarget(filter);

        let mut delta = FilterDelta::default();
        let mut replayed = vec![0usize; self.groups.len()];
        let changes = flips
            .accepted
            .iter()
            .map(|&id| (id, false))
            .chain(flips.rejected.iter().map(|&id| (id, true)));
        for (id, reject) in changes {
            let before = self.rejected[id];
            let after = if reject { before | bit } else { before & !bit };
            self.rejected[id] = after;
            match (before == 0, after == 0) {
                (false, true) => delta.added += 1,
                (true, false) => delta.removed += 1,
                _ => {}
            }
            let record = &self.records[id];
            for (group, n) in self.groups.iter_mut().zip(replayed.iter_mut()) {
                let key = self.dimensions[group.dimension()].key_at(id);
                if group.transition(before, after, key, record) {
                    *n += 1;
                }
            }
        }
        self.active = self.active + delta.added - delta.removed;

        for (index, (group, n)) in self.groups.iter().zip(&replayed).enumerate() {
            trace!(group = index, reducer = group.reducer_id(), replayed = *n, "group replayed");
        }

        debug!(
            dimension = self.dimensions[d].name(),
            flipped = flips.accepted.len() + flips.rejected.len(),
            added = delta.added,
            removed = delta.removed,
            active = self.active,
            "filter changed"
        );
        Ok(delta)
    }

    pub fn filter(&mut self, dim: DimensionId, filter: Filter) -> Result<FilterDelta> {
        self.set_filter(dim, Some(filter))
    }

    pub fn filter_exact(&mut self, dim: DimensionId, key: impl Into<Key>) -> Result<FilterDelta> {
        self.set_filter(dim, Some(Filter::exact(key)))
    }

    /// Half-open `[lo, hi)` filter.
    pub fn filter_range(&mut self, dim: DimensionId, lo: impl Into<Key>, hi: impl Into<Key>) -> Result<FilterDelta> {
        self.set_filter(dim, Some(Filter::range(lo, hi)))
    }

    pub fn clear_filter(&mut self, dim: DimensionId) -> Result<FilterDelta> {
        self.set_filter(dim, None)
    }

    /// Clear every dimension's filter. Afterwards each group equals its
    /// full-dataset aggregation.
    pub fn reset_all(&mut self) -> FilterDelta {
        let mut total = FilterDelta::default();
        for index in 0..self.dimensions.len() {
            if !self.dimensions[index].has_filter() {
                continue;
            }
            let dim = DimensionId { owner: self.id, index };
            // Handle is minted from our own id and an in-range index.
            if let Ok(delta) = self.set_filter(dim, None) {
                total.merge(delta);
            }
        }
        debug!(added = total.added, removed = total.removed, "all filters reset");
        total
    }

    /// Ids of records satisfying every active filter, ascending.
    pub fn current_active_set(&self) -> Vec<usize> {
        self.rejected
            .iter()
            .enumerate()
            .filter(|&(_, &mask)| mask == 0)
            .map(|(id, _)| id)
            .collect()
    }

    /// Size of the active set.
    pub fn active_count(&self) -> usize { self.active }

    pub fn is_active(&self, id: usize) -> bool {
        self.rejected.get(id).is_some_and(|&mask| mask == 0)
    }

    /// Active records ordered by `dim`'s key (record order within a key).
    pub fn active_records_by(&self, dim: DimensionId) -> Result<Vec<&Record>> {
        let dimension = self.dimension(dim)?;
        Ok(dimension
            .partitions()
            .flat_map(|(_, ids)| ids.iter())
            .filter(|&&id| self.rejected[id] == 0)
            .map(|&id| &self.records[id])
            .collect())
    }

    /// Reduce the group's current view from scratch, leaving its state untouched.
    pub fn aggregate_from_scratch<R: Reducer>(&self, handle: GroupHandle<R>) -> Result<BTreeMap<Key, R::State>> {
        let group = self.group(handle)?;
        let dimension = &self.dimensions[group.dimension_index()];
        Ok(group.from_scratch(&self.records, &self.rejected, dimension))
    }

    /// Discard the group's incremental state and recompute it.
    pub fn rebuild_group<R: Reducer>(&mut self, handle: GroupHandle<R>) -> Result<()> {
        let index = self.group_index(handle.owner, handle.index)?;
        let slot = &mut self.groups[index];
        let d = slot.dimension();
        warn!(group = slot.reducer_id(), "rebuilding group from scratch");
        slot.rebuild(&self.records, &self.rejected, &self.dimensions[d]);
        Ok(())
    }

    /// Compare the group's incremental state with a from-scratch aggregation.
    pub fn verify_group<R: Reducer>(&self, handle: GroupHandle<R>, eps: f64) -> Result<bool> {
        let index = self.group_index(handle.owner, handle.index)?;
        Ok(self.slot_matches(index, eps))
    }

    /// Compare every group with its from-scratch aggregation.
    pub fn verify_all(&self, eps: f64) -> bool {
        (0..self.groups.len()).all(|index| self.slot_matches(index, eps))
    }

    fn slot_matches(&self, index: usize, eps: f64) -> bool {
        let slot = &self.groups[index];
        let ok = slot.matches_scratch(&self.records, &self.rejected, &self.dimensions[slot.dimension()], eps);
        trace!(group = slot.reducer_id(), ok, "verified group");
        ok
    }

    fn dimension_index(&self, dim: DimensionId) -> Result<usize> {
        if dim.owner != self.id || dim.index >= self.dimensions.len() {
            return Err(CrossfilterError::InvalidHandle { kind: HandleKind::Dimension, index: dim.index });
        }
        Ok(dim.index)
    }

    fn group_index(&self, owner: AggregatorId, index: usize) -> Result<usize> {
        if owner != self.id || index >= self.groups.len() {
            return Err(CrossfilterError::InvalidHandle { kind: HandleKind::Group, index });
        }
        Ok(index)
    }
}
