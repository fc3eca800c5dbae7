//! Result type of `Dataset::group_by`.

use std::collections::HashMap;
use std::hash::Hash;

/// Elements grouped by key, keys kept in first-seen order.
#[derive(Debug, Clone)]
pub struct Groups<K, T> {
    entries: Vec<(K, Vec<T>)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone, T> Groups<K, T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append `value` to the group for `key`, opening the group if needed.
    pub fn push(&mut self, key: K, value: T) {
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1.push(value),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, vec![value]));
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&[T]> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1.as_slice())
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[T])> + '_ {
        self.entries
            .iter()
            .map(|(key, values)| (key, values.as_slice()))
    }

    pub fn into_vec(self) -> Vec<(K, Vec<T>)> {
        self.entries
    }

    pub fn into_hash_map(self) -> HashMap<K, Vec<T>> {
        self.entries.into_iter().collect()
    }
}

impl<K: Eq + Hash + Clone, T> Default for Groups<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

// Equality includes key order.
impl<K: PartialEq, T: PartialEq> PartialEq for Groups<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K, T> IntoIterator for Groups<K, T> {
    type Item = (K, Vec<T>);
    type IntoIter = std::vec::IntoIter<(K, Vec<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
