// File: crates/crossfilter-core/src/filter.rs
// Summary: Filter predicates a dimension can hold (exact, range, multi-select, custom).

use std::fmt;

use crate::key::Key;

/// Active predicate over a dimension's keys.
pub enum Filter {
    /// Key equals the value (click on a bar or pie slice).
    Exact(Key),
    /// Half-open interval `[lo, hi)` (brush selection).
    Range { lo: Key, hi: Key },
    /// Key is one of the values (multi-click selection).
    AnyOf(Vec<Key>),
    /// Arbitrary predicate over the key.
    Custom(Box<dyn Fn(&Key) -> bool>),
}

impl Filter {
    pub fn exact(key: impl Into<Key>) -> Self {
        Filter::Exact(key.into())
    }

    pub fn range(lo: impl Into<Key>, hi: impl Into<Key>) -> Self {
        Filter::Range { lo: lo.into(), hi: hi.into() }
    }

    pub fn any_of<K: Into<Key>>(keys: impl IntoIterator<Item = K>) -> Self {
        let mut keys: Vec<Key> = keys.into_iter().map(Into::into).collect();
        keys.sort();
        keys.dedup();
        Filter::AnyOf(keys)
    }

    pub fn custom(predicate: impl Fn(&Key) -> bool + 'static) -> Self {
        Filter::Custom(Box::new(predicate))
    }

    pub fn accepts(&self, key: &Key) -> bool {
        match self {
            Filter::Exact(want) => key == want,
            Filter::Range { lo, hi } => key >= lo && key < hi,
            Filter::AnyOf(keys) => keys.binary_search(key).is_ok(),
            Filter::Custom(predicate) => predicate(key),
        }
    }
}

/// Verdict of an optional filter; no filter accepts everything.
#[inline]
pub(crate) fn accepts(filter: Option<&Filter>, key: &Key) -> bool {
    filter.map_or(true, |f| f.accepts(key))
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Exact(k) => f.debug_tuple("Exact").field(k).finish(),
            Filter::Range { lo, hi } => f.debug_struct("Range").field("lo", lo).field("hi", hi).finish(),
            Filter::AnyOf(keys) => f.debug_tuple("AnyOf").field(keys).finish(),
            Filter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_half_open() {
        let f = Filter::range(-1i64, 2i64);
        assert!(f.accepts(&Key::Int(-1)));
        assert!(f.accepts(&Key::Int(1)));
        assert!(!f.accepts(&Key::Int(2)));
        assert!(!f.accepts(&Key::Invalid));
    }

    #[test]
    fn any_of_matches_members_only() {
        let f = Filter::any_of(["Q3", "Q1", "Q1"]);
        assert!(f.accepts(&Key::from("Q1")));
        assert!(f.accepts(&Key::from("Q3")));
        assert!(!f.accepts(&Key::from("Q2")));
    }

    #[test]
    fn custom_predicate() {
        let f = Filter::custom(|k| k.as_int().is_some_and(|v| v % 2 == 0));
        assert!(f.accepts(&Key::Int(4)));
        assert!(!f.accepts(&Key::Int(5)));
        assert!(!f.accepts(&Key::from("4")));
    }
}
