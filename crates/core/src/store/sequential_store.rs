use std::collections::BTreeMap;
use std::ops::Bound;

use log::error;

use crate::errors::{Error, Result};

/// Append-mostly collection keyed by a monotonically increasing integer.
///
/// Keys are chosen by the caller. The store only guarantees that every key it
/// accepts is strictly greater than any key it has ever accepted, including
/// keys that were later removed or wiped. That high-water mark is what makes
/// identifiers non-reusable across a full wipe.
#[derive(Debug, Clone)]
pub struct SequentialStore<T> {
    records: BTreeMap<u64, T>,
    high_water: u64,
}

impl<T> Default for SequentialStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SequentialStore<T> {
    pub fn new() -> Self {
        Self::with_high_water(0)
    }

    /// Creates an empty store that will only accept keys above `high_water`.
    pub fn with_high_water(high_water: u64) -> Self {
        Self {
            records: BTreeMap::new(),
            high_water,
        }
    }

    /// Inserts `record` under `key`.
    ///
    /// A duplicate or non-increasing key means the caller's allocator is broken,
    /// so it is reported as an invariant violation rather than a client error.
    pub fn insert(&mut self, key: u64, record: T) -> Result<u64> {
        if key == 0 || key <= self.high_water {
            error!(
                "Rejected sequential insert: key {} is not above high-water mark {}",
                key, self.high_water
            );
            return Err(Error::InvariantViolation(format!(
                "key {} already issued (high-water mark {})",
                key, self.high_water
            )));
        }
        self.records.insert(key, record);
        self.high_water = key;
        Ok(key)
    }

    pub fn get(&self, key: u64) -> Option<&T> {
        self.records.get(&key)
    }

    pub fn get_mut(&mut self, key: u64) -> Option<&mut T> {
        self.records.get_mut(&key)
    }

    /// Removes a single record. The high-water mark is left untouched.
    pub fn remove(&mut self, key: u64) -> Option<T> {
        self.records.remove(&key)
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every record and returns how many there were.
    pub fn wipe(&mut self) -> usize {
        let previous = self.records.len();
        self.records.clear();
        previous
    }

    /// Greatest key ever inserted (0 when nothing was ever inserted).
    pub fn high_water(&self) -> u64 {
        self.high_water
    }

    pub fn first_key(&self) -> Option<u64> {
        self.records.keys().next().copied()
    }

    pub fn last_key(&self) -> Option<u64> {
        self.records.keys().next_back().copied()
    }

    /// Live records with `after < key <= upto`, ascending.
    pub fn range(&self, after: u64, upto: u64) -> impl Iterator<Item = (u64, &T)> {
        let upper = if upto <= after {
            Bound::Included(after)
        } else {
            Bound::Included(upto)
        };
        self.records
            .range((Bound::Excluded(after), upper))
            .map(|(k, v)| (*k, v))
    }

    /// Up to `limit` live records with `key > after`, ascending.
    pub fn range_after(&self, after: u64, limit: usize) -> impl Iterator<Item = (u64, &T)> {
        self.records
            .range((Bound::Excluded(after), Bound::Unbounded))
            .take(limit)
            .map(|(k, v)| (*k, v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &T)> {
        self.records.iter().map(|(k, v)| (*k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u64, &mut T)> {
        self.records.iter_mut().map(|(k, v)| (*k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_count() {
        let mut store = SequentialStore::new();
        assert_eq!(store.insert(1, "a").unwrap(), 1);
        assert_eq!(store.insert(2, "b").unwrap(), 2);

        assert_eq!(store.get(1), Some(&"a"));
        assert_eq!(store.get(3), None);
        assert_eq!(store.count(), 2);
        assert_eq!(store.first_key(), Some(1));
        assert_eq!(store.last_key(), Some(2));
    }

    #[test]
    fn test_duplicate_key_is_invariant_violation() {
        let mut store = SequentialStore::new();
        store.insert(1, "a").unwrap();

        let err = store.insert(1, "again").unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
        assert_eq!(store.get(1), Some(&"a"));
    }

    #[test]
    fn test_key_zero_is_rejected() {
        let mut store: SequentialStore<&str> = SequentialStore::new();
        assert!(store.insert(0, "zero").is_err());
    }

    #[test]
    fn test_wipe_keeps_high_water_mark() {
        let mut store = SequentialStore::new();
        store.insert(1, "a").unwrap();
        store.insert(2, "b").unwrap();

        assert_eq!(store.wipe(), 2);
        assert_eq!(store.count(), 0);
        assert_eq!(store.high_water(), 2);
        assert!(store.insert(2, "reused").is_err());
        assert_eq!(store.insert(3, "c").unwrap(), 3);
        assert_eq!(store.first_key(), Some(3));
    }

    #[test]
    fn test_range_is_exclusive_inclusive() {
        let mut store = SequentialStore::new();
        for key in 1..=6 {
            store.insert(key, key * 10).unwrap();
        }

        let keys: Vec<u64> = store.range(2, 5).map(|(k, _)| k).collect();
        assert_eq!(keys, vec![3, 4, 5]);

        assert_eq!(store.range(5, 5).count(), 0);
        assert_eq!(store.range(6, 2).count(), 0);
    }

    #[test]
    fn test_range_after_respects_limit() {
        let mut store = SequentialStore::new();
        for key in 1..=8 {
            store.insert(key, key).unwrap();
        }
        store.wipe();
        for key in 9..=12 {
            store.insert(key, key).unwrap();
        }

        let keys: Vec<u64> = store.range_after(0, 3).map(|(k, _)| k).collect();
        assert_eq!(keys, vec![9, 10, 11]);
        let keys: Vec<u64> = store.range_after(10, 5).map(|(k, _)| k).collect();
        assert_eq!(keys, vec![11, 12]);
        assert_eq!(store.range_after(12, 5).count(), 0);
    }

    #[test]
    fn test_remove_does_not_lower_high_water() {
        let mut store = SequentialStore::new();
        store.insert(1, "a").unwrap();
        store.insert(2, "b").unwrap();

        assert_eq!(store.remove(2), Some("b"));
        assert_eq!(store.high_water(), 2);
        assert_eq!(store.last_key(), Some(1));
    }
}
