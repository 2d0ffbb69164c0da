// File: crates/crossfilter-core/src/dimension.rs
// Summary: Dimension = precomputed key column + key index + optional filter.

use std::collections::BTreeMap;

use crate::filter::{self, Filter};
use crate::key::Key;
use crate::record::Record;

/// Records whose verdict under one dimension flipped after a filter change.
#[derive(Debug, Default)]
pub(crate) struct Flips {
    /// Previously rejected by this dimension, now accepted.
    pub accepted: Vec<usize>,
    /// Previously accepted by this dimension, now rejected.
    pub rejected: Vec<usize>,
}

pub struct Dimension {
    name: String,
    bit: u64,
    /// Key of every record, by record id. Computed once at registration.
    keys: Vec<Key>,
    /// Record ids per distinct key, ids ascending.
    index: BTreeMap<Key, Vec<usize>>,
    filter: Option<Filter>,
}

impl Dimension {
    pub(crate) fn new(
        name: impl Into<String>,
        position: usize,
        records: &[Record],
        key_fn: impl Fn(&Record) -> Key,
    ) -> Self {
        let keys: Vec<Key> = records.iter().map(key_fn).collect();
        let mut index: BTreeMap<Key, Vec<usize>> = BTreeMap::new();
        for (id, key) in keys.iter().enumerate() {
            match index.get_mut(key) {
                Some(ids) => ids.push(id),
                None => { index.insert(key.clone(), vec![id]); }
            }
        }
        Self { name: name.into(), bit: 1u64 << position, keys, index, filter: None }
    }

    pub fn name(&self) -> &str { &self.name }

    /// Bit this dimension sets in a record's rejection mask.
    pub(crate) fn bit(&self) -> u64 { self.bit }

    /// Key of record `id`, or `None` past the end of the dataset.
    pub fn key_of(&self, id: usize) -> Option<&Key> { self.keys.get(id) }

    /// Key of a record id the owning aggregator knows to be in range.
    pub(crate) fn key_at(&self, id: usize) -> &Key { &self.keys[id] }

    /// Distinct keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ { self.index.keys() }

    /// Record ids per distinct key, in key order.
    pub fn partitions(&self) -> impl Iterator<Item = (&Key, &[usize])> + '_ {
        self.index.iter().map(|(k, ids)| (k, ids.as_slice()))
    }

    pub fn filter(&self) -> Option<&Filter> { self.filter.as_ref() }

    pub fn has_filter(&self) -> bool { self.filter.is_some() }

    /// Whether the current filter (if any) accepts `key`.
    pub fn accepts(&self, key: &Key) -> bool { filter::accepts(self.filter.as_ref(), key) }

    /// Install `next` and report which records changed verdict.
    /// The predicate is evaluated once per distinct key; only the ids under keys
    /// whose verdict changed are visited.
    pub(crate) fn retarget(&mut self, next: Option<Filter>) -> Flips {
        let mut flips = Flips::default();
        for (key, ids) in &self.index {
            let before = filter::accepts(self.filter.as_ref(), key);
            let after = filter::accepts(next.as_ref(), key);
            match (before, after) {
                (false, true) => flips.accepted.extend_from_slice(ids),
                (true, false) => flips.rejected.extend_from_slice(ids),
                _ => {}
            }
        }
        self.filter = next;
        flips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use chrono::NaiveDate;

    fn records() -> Vec<Record> {
        [(2000, 1.0, 2.0), (2001, 2.0, 1.0), (2000, 3.0, 3.0), (2002, 1.0, 4.0)]
            .iter()
            .map(|&(y, o, c)| Record::new(NaiveDate::from_ymd_opt(y, 3, 1).expect("valid date"), o, c, 0.0))
            .collect()
    }

    #[test]
    fn index_groups_ids_by_key() {
        let d = Dimension::new("year", 0, &records(), keys::year);
        let parts: Vec<(Key, Vec<usize>)> = d.partitions().map(|(k, ids)| (k.clone(), ids.to_vec())).collect();
        assert_eq!(parts, vec![
            (Key::Int(2000), vec![0, 2]),
            (Key::Int(2001), vec![1]),
            (Key::Int(2002), vec![3]),
        ]);
    }

    #[test]
    fn key_of_is_none_past_the_last_record() {
        let d = Dimension::new("year", 0, &records(), keys::year);
        assert_eq!(d.key_of(1), Some(&Key::Int(2001)));
        assert_eq!(d.key_of(4), None);
        assert_eq!(d.key_of(usize::MAX), None);
    }

    #[test]
    fn retarget_reports_only_flipped_records() {
        let mut d = Dimension::new("year", 3, &records(), keys::year);
        assert_eq!(d.bit(), 1 << 3);

        let flips = d.retarget(Some(Filter::range(2000i64, 2002i64)));
        assert!(flips.accepted.is_empty());
        assert_eq!(flips.rejected, vec![3]);

        let flips = d.retarget(Some(Filter::exact(2002i64)));
        assert_eq!(flips.accepted, vec![3]);
        assert_eq!(flips.rejected, vec![0, 2, 1]);

        let flips = d.retarget(None);
        assert_eq!(flips.accepted, vec![0, 2, 1]);
        assert!(flips.rejected.is_empty());
        assert!(!d.has_filter());
    }
}
