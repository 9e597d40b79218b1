//! Set-valued map shared by the publisher and subscriber indices.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

/// Maps a key to a non-empty set of values.
///
/// Inserting into a missing key creates its set; removing the last value of a set drops
/// the key. No key is ever left mapped to an empty set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetMultiMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    inner: HashMap<K, HashSet<V>>,
}

impl<K, V> SetMultiMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Add `value` to the set under `key`. Returns `false` if it was already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.inner.entry(key).or_default().insert(value)
    }

    /// Remove `value` from the set under `key`, dropping the key once its set is empty.
    ///
    /// Returns `false` if the pair was not present.
    pub fn remove<Q, R>(&mut self, key: &Q, value: &R) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
        V: Borrow<R>,
        R: Eq + Hash + ?Sized,
    {
        let Some(values) = self.inner.get_mut(key) else {
            return false;
        };
        let removed = values.remove(value);
        if values.is_empty() {
            self.inner.remove(key);
        }
        removed
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&HashSet<V>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.get(key)
    }

    pub fn contains<Q, R>(&self, key: &Q, value: &R) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
        V: Borrow<R>,
        R: Eq + Hash + ?Sized,
    {
        self.inner
            .get(key)
            .is_some_and(|values| values.contains(value))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.contains_key(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Ordered copy, for snapshots and stable output.
    pub fn to_ordered(&self) -> BTreeMap<K, BTreeSet<V>>
    where
        K: Ord + Clone,
        V: Ord + Clone,
    {
        self.inner
            .iter()
            .map(|(key, values)| (key.clone(), values.iter().cloned().collect()))
            .collect()
    }
}

impl<K, V> Default for SetMultiMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_creates_set_for_new_key() {
        let mut map = SetMultiMap::new();

        assert!(map.insert("f1", "t1"));
        assert!(map.insert("f1", "t2"));
        assert!(!map.insert("f1", "t1"));

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("f1").map(HashSet::len), Some(2));
    }

    #[test]
    fn removing_last_value_drops_key() {
        let mut map = SetMultiMap::new();
        map.insert("f1", "t1");
        map.insert("f1", "t2");

        assert!(map.remove("f1", "t1"));
        assert!(map.contains_key("f1"));

        assert!(map.remove("f1", "t2"));
        assert!(!map.contains_key("f1"));
        assert!(map.is_empty());
    }

    #[test]
    fn removing_absent_pair_is_a_no_op() {
        let mut map = SetMultiMap::new();
        map.insert("f1", "t1");
        let before = map.clone();

        assert!(!map.remove("f1", "t9"));
        assert!(!map.remove("f9", "t1"));
        assert_eq!(map, before);
    }

    #[test]
    fn to_ordered_sorts_keys_and_values() {
        let mut map = SetMultiMap::new();
        map.insert("b", 2);
        map.insert("a", 3);
        map.insert("a", 1);

        let ordered = map.to_ordered();
        let flat: Vec<_> = ordered
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |value| (*key, *value)))
            .collect();
        assert_eq!(flat, vec![("a", 1), ("a", 3), ("b", 2)]);
    }
}
