// File: crates/crossfilter-core/src/group.rs
// Summary: Group = reducer + key -> state map, maintained from active-set transitions.

use std::any::Any;
use std::collections::BTreeMap;

use crate::dimension::Dimension;
use crate::key::Key;
use crate::record::Record;
use crate::reducer::{ApproxEq, Reducer};

/// Which filters a group observes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroupScope {
    /// Every dimension's filter, including the group's own.
    #[default]
    AllFilters,
    /// Every filter except the one on the group's own dimension, so a filtered
    /// chart keeps showing the bars outside its selection.
    ExcludeOwnDimension,
}

pub struct Group<R: Reducer> {
    reducer: R,
    dimension: usize,
    scope: GroupScope,
    /// Rejection-mask bits this group disregards.
    ignored: u64,
    states: BTreeMap<Key, R::State>,
}

impl<R: Reducer> Group<R> {
    pub(crate) fn new(reducer: R, dimension: usize, dimension_bit: u64, scope: GroupScope) -> Self {
        let ignored = match scope {
            GroupScope::AllFilters => 0,
            GroupScope::ExcludeOwnDimension => dimension_bit,
        };
        Self { reducer, dimension, scope, ignored, states: BTreeMap::new() }
    }

    pub fn id(&self) -> &'static str { self.reducer.id() }

    pub fn reducer(&self) -> &R { &self.reducer }

    pub fn scope(&self) -> GroupScope { self.scope }

    /// Index of the dimension this group partitions by.
    pub fn dimension_index(&self) -> usize { self.dimension }

    /// Number of keys, including keys whose partition is currently empty.
    pub fn size(&self) -> usize { self.states.len() }

    pub fn get(&self, key: &Key) -> Option<&R::State> { self.states.get(key) }

    /// All `(key, state)` pairs in key order.
    pub fn all(&self) -> impl Iterator<Item = (&Key, &R::State)> + '_ { self.states.iter() }

    /// The `k` entries with the largest `score`, largest first. Ties keep key order.
    pub fn top_by(&self, k: usize, score: impl Fn(&R::State) -> f64) -> Vec<(&Key, &R::State)> {
        let mut entries: Vec<(&Key, &R::State)> = self.states.iter().collect();
        entries.sort_by(|a, b| score(b.1).total_cmp(&score(a.1)));
        entries.truncate(k);
        entries
    }

    /// Whether a record with this rejection mask belongs to the group's view.
    #[inline]
    fn observes(&self, mask: u64) -> bool { mask & !self.ignored == 0 }

    fn add(&mut self, key: &Key, record: &Record) {
        match self.states.get_mut(key) {
            Some(state) => *state = self.reducer.add(state.clone(), record),
            None => {
                let state = self.reducer.add(self.reducer.initial(), record);
                self.states.insert(key.clone(), state);
            }
        }
    }

    fn remove(&mut self, key: &Key, record: &Record) {
        if let Some(state) = self.states.get_mut(key) {
            *state = self.reducer.remove(state.clone(), record);
        }
    }

    /// Reduce the records currently in view without touching incremental state.
    pub(crate) fn from_scratch(
        &self,
        records: &[Record],
        rejected: &[u64],
        dimension: &Dimension,
    ) -> BTreeMap<Key, R::State> {
        let mut out = BTreeMap::new();
        for (key, ids) in dimension.partitions() {
            let state = ids
                .iter()
                .filter(|&&id| self.observes(rejected[id]))
                .fold(self.reducer.initial(), |s, &id| self.reducer.add(s, &records[id]));
            out.insert(key.clone(), state);
        }
        out
    }
}

/// Object-safe face of `Group<R>` so the aggregator can hold groups of any reducer.
pub(crate) trait GroupSlot {
    fn dimension(&self) -> usize;
    fn reducer_id(&self) -> &'static str;
    /// Replay one record's mask change; calls `add`/`remove` at most once and
    /// reports whether it did.
    fn transition(&mut self, before: u64, after: u64, key: &Key, record: &Record) -> bool;
    fn rebuild(&mut self, records: &[Record], rejected: &[u64], dimension: &Dimension);
    fn matches_scratch(&self, records: &[Record], rejected: &[u64], dimension: &Dimension, eps: f64) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<R: Reducer> GroupSlot for Group<R> {
    fn dimension(&self) -> usize { self.dimension }

    fn reducer_id(&self) -> &'static str { self.reducer.id() }

    fn transition(&mut self, before: u64, after: u64, key: &Key, record: &Record) -> bool {
        match (self.observes(before), self.observes(after)) {
            (false, true) => self.add(key, record),
            (true, false) => self.remove(key, record),
            _ => return false,
        }
        true
    }

    fn rebuild(&mut self, records: &[Record], rejected: &[u64], dimension: &Dimension) {
        self.states = self.from_scratch(records, rejected, dimension);
    }

    fn matches_scratch(&self, records: &[Record], rejected: &[u64], dimension: &Dimension, eps: f64) -> bool {
        let fresh = self.from_scratch(records, rejected, dimension);
        fresh.len() == self.states.len()
            && fresh
                .iter()
                .zip(self.states.iter())
                .all(|((fk, fs), (k, s))| fk == k && fs.approx_eq(s, eps))
    }

    fn as_any(&self) -> &dyn Any { self }
}
