//! Ordered one-to-many map used for dominance relations.
//!
//! Dominator trees and dominance frontiers are both "block to set of blocks"
//! relations. [`Multimap`] stores them with ordered keys and ordered value sets
//! so that iteration, `Debug` output and DOT rendering are deterministic.
//!
//! Reads never insert. Accumulation code asks for a slot explicitly with
//! [`get_or_insert_default`](Multimap::get_or_insert_default), which keeps the
//! difference between looking at a relation and growing it visible at the call
//! site.

use std::collections::{btree_map, BTreeMap, BTreeSet};

/// An ordered map from keys to ordered sets of values.
///
/// # Examples
///
/// ```rust
/// use cfgdom::graph::Multimap;
///
/// let mut children: Multimap<u32, u32> = Multimap::new();
/// children.insert(0, 2);
/// children.insert(0, 1);
/// children.get_or_insert_default(1);
///
/// assert_eq!(children.values(&0).collect::<Vec<_>>(), vec![1, 2]);
/// assert!(children.get(&1).is_some_and(|set| set.is_empty()));
/// assert!(children.get(&7).is_none());
/// assert_eq!(children.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multimap<K, V> {
    map: BTreeMap<K, BTreeSet<V>>,
}

impl<K: Ord, V: Ord> Default for Multimap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V: Ord> Multimap<K, V> {
    /// Creates an empty multimap.
    #[must_use]
    pub fn new() -> Self {
        Multimap {
            map: BTreeMap::new(),
        }
    }

    /// Returns the value set of `key`, or `None` if the key was never inserted.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&BTreeSet<V>> {
        self.map.get(key)
    }

    /// Returns the value set of `key`, inserting an empty set first if needed.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut BTreeSet<V> {
        self.map.entry(key).or_default()
    }

    /// Adds `value` to the set of `key`.
    ///
    /// Returns `true` if the value was not present yet.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.get_or_insert_default(key).insert(value)
    }

    /// Returns `true` if `value` is in the set of `key`.
    #[must_use]
    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.map.get(key).is_some_and(|set| set.contains(value))
    }

    /// Returns `true` if `key` has a (possibly empty) set.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Removes `key` and returns its set.
    pub fn take(&mut self, key: &K) -> Option<BTreeSet<V>> {
        self.map.remove(key)
    }

    /// Returns the values of `key` in order; empty for unknown keys.
    pub fn values<'a>(&'a self, key: &K) -> impl Iterator<Item = V> + 'a
    where
        V: Copy,
    {
        self.map.get(key).into_iter().flatten().copied()
    }

    /// Returns the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.map.keys()
    }

    /// Returns `(key, set)` pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, K, BTreeSet<V>> {
        self.map.iter()
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the total number of values across all keys.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.map.values().map(BTreeSet::len).sum()
    }
}

impl<'a, K, V> IntoIterator for &'a Multimap<K, V> {
    type Item = (&'a K, &'a BTreeSet<V>);
    type IntoIter = btree_map::Iter<'a, K, BTreeSet<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}
