//! Insertion-ordered map.
//!
//! Catalog listings, row buckets and resolver tie-breaks all depend on a stable
//! iteration order. `OrderedMap` makes that order explicit: iteration follows
//! first insertion, and overwriting an existing key keeps its position.

use std::collections::HashMap;
use std::hash::Hash;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

// Equality is over the ordered entries; the index is derived from them.
impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K, V> OrderedMap<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = *self.index.get(key)?;
        Some(&mut self.entries[i].1)
    }

    /// Insert or replace. A replaced value keeps the key's original position.
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&i) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Get the value for `key`, inserting `make()` at the end when absent.
    pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.clone(), i);
                self.entries.push((key, make()));
                i
            }
        };
        &mut self.entries[i].1
    }

    /// Remove `key`, preserving the relative order of the remaining entries.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let i = self.index.remove(key)?;
        let (_, value) = self.entries.remove(i);
        for (k, _) in &self.entries[i..] {
            if let Some(slot) = self.index.get_mut(k) {
                *slot -= 1;
            }
        }
        Some(value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Clone + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K, V> Serialize for OrderedMap<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedMap<K, V>
where
    K: Deserialize<'de> + Clone + Eq + Hash,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<(K, V)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_keeps_original_position() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.insert("a", 3), Some(1));

        let pairs: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn remove_reindexes_tail() {
        let mut map: OrderedMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(map.remove(&"a"), Some(1));
        assert_eq!(map.get(&"c"), Some(&3));
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(map.remove(&"missing"), None);
    }

    #[test]
    fn get_or_insert_with_appends_once() {
        let mut map: OrderedMap<&str, Vec<i32>> = OrderedMap::new();
        map.get_or_insert_with("k", Vec::new).push(1);
        map.get_or_insert_with("k", Vec::new).push(2);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&"k"), Some(&vec![1, 2]));
    }

    #[test]
    fn equality_follows_entry_order() {
        let ab: OrderedMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let ba: OrderedMap<&str, i32> = [("b", 2), ("a", 1)].into_iter().collect();
        assert_ne!(ab, ba);

        let mut rebuilt: OrderedMap<&str, i32> = [("x", 0), ("a", 1), ("b", 2)].into_iter().collect();
        rebuilt.remove(&"x");
        assert_eq!(rebuilt, ab);
    }

    #[test]
    fn serializes_as_ordered_pairs() {
        let map: OrderedMap<String, i32> =
            [("z".to_string(), 1), ("a".to_string(), 2)].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"[["z",1],["a",2]]"#);

        let back: OrderedMap<String, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: after any sequence of inserts and removes, lookups agree
            /// with the entry list and keys stay in first-insertion order.
            #[test]
            fn index_tracks_entries(ops in prop::collection::vec((any::<bool>(), 0u8..8, any::<i32>()), 0..64)) {
                let mut map: OrderedMap<u8, i32> = OrderedMap::new();
                let mut model: Vec<(u8, i32)> = Vec::new();

                for (is_insert, key, value) in ops {
                    if is_insert {
                        map.insert(key, value);
                        match model.iter_mut().find(|(k, _)| *k == key) {
                            Some(slot) => slot.1 = value,
                            None => model.push((key, value)),
                        }
                    } else {
                        map.remove(&key);
                        model.retain(|(k, _)| *k != key);
                    }
                }

                let pairs: Vec<(u8, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
                prop_assert_eq!(&pairs, &model);
                for (k, v) in &model {
                    prop_assert_eq!(map.get(k), Some(v));
                }
            }
        }
    }
}
