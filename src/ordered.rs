/// Order-preserving keyed storage shared by Region, Station and Day-level
/// containers.
///
/// Entries live in a `Vec` in insertion order; a `HashMap` from key to
/// position gives O(1) lookup. The first entry inserted for a key wins and
/// is never replaced. An optional limit caps the number of entries.

use std::collections::HashMap;

use crate::model::{CapacityExceeded, Level};

#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    entries: Vec<V>,
    index: HashMap<String, usize>,
    limit: Option<usize>,
    level: Level,
}

impl<V> OrderedMap<V> {
    /// `limit: None` means unbounded.
    pub fn new(level: Level, limit: Option<usize>) -> Self {
        OrderedMap {
            entries: Vec::new(),
            index: HashMap::new(),
            limit,
            level,
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Returns the entry for `key`, creating it with `make` if absent.
    ///
    /// An existing entry is returned untouched even if `make` would have
    /// produced something different. Creation fails without side effects
    /// once the limit is reached.
    pub fn get_or_insert_with<F>(&mut self, key: &str, make: F) -> Result<&mut V, CapacityExceeded>
    where
        F: FnOnce() -> V,
    {
        if let Some(&i) = self.index.get(key) {
            return Ok(&mut self.entries[i]);
        }

        if let Some(limit) = self.limit {
            if self.entries.len() >= limit {
                return Err(CapacityExceeded {
                    level: self.level,
                    key: key.to_string(),
                    limit,
                });
            }
        }

        let i = self.entries.len();
        self.entries.push(make());
        self.index.insert(key.to_string(), i);
        Ok(&mut self.entries[i])
    }

    pub fn values(&self) -> std::slice::Iter<'_, V> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
