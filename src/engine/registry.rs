//! Concurrent registry of distinct station names
//!
//! Workers register a station the first time their own partition table sees
//! it. The registry is the only structure written by several workers at once;
//! after the parallel phase it is frozen into a sorted key list that drives
//! the merge and the output order.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct KeyRegistry {
    keys: Mutex<HashSet<Box<[u8]>>>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a station name, returning `true` if it was not yet known
    pub fn insert(&self, key: &[u8]) -> bool {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if keys.contains(key) {
            return false;
        }
        keys.insert(key.into())
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Freeze the registry into keys sorted by raw byte order
    pub fn into_sorted(self) -> Vec<Box<[u8]>> {
        let keys = self
            .keys
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<_> = keys.into_iter().collect();
        keys.sort_unstable();
        keys
    }
}
