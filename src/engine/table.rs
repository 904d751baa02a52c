//! Fixed-capacity, open-addressed partition table
//!
//! Each worker owns one table. Slots are indexed by `hash & (capacity - 1)`
//! and collisions are resolved by linear probing. A slot keeps its own copy
//! of the station name and a lookup only matches when both the hash and the
//! name bytes agree, so two stations sharing a hash never share statistics.
//!
//! The table never grows. It is sized up front for the expected number of
//! stations and reports [`AggregatorError::TableFull`] if that estimate is
//! exceeded.

use super::accumulator::Accumulator;
use super::registry::KeyRegistry;
use crate::error::{AggregatorError, Result};

#[derive(Debug, Clone)]
struct Slot {
    hash: u32,
    key: Box<[u8]>,
    stats: Accumulator,
}

impl Slot {
    #[inline(always)]
    fn matches(&self, hash: u32, key: &[u8]) -> bool {
        self.hash == hash && *self.key == *key
    }
}

#[derive(Debug, Clone)]
pub struct PartitionTable {
    slots: Vec<Option<Slot>>,
    mask: usize,
    len: usize,
}

impl PartitionTable {
    /// Create a table with at least `capacity` slots, rounded up to a power of two
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        Self {
            slots: vec![None; capacity],
            mask: capacity - 1,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of distinct stations held
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Record `value` for the station `key` whose hash is `hash`.
    ///
    /// The first measurement for a station seeds a new accumulator and
    /// registers the name in `registry`; later ones update it in place.
    pub fn upsert(
        &mut self,
        hash: u32,
        key: &[u8],
        value: i16,
        registry: &KeyRegistry,
    ) -> Result<&mut Accumulator> {
        let index = self.probe(hash, key)?;
        let slot = &mut self.slots[index];

        match slot {
            Some(existing) => {
                existing.stats.record(value);
                Ok(&mut existing.stats)
            }
            None => {
                registry.insert(key);
                self.len += 1;
                let inserted = slot.insert(Slot {
                    hash,
                    key: key.into(),
                    stats: Accumulator::new(value),
                });
                Ok(&mut inserted.stats)
            }
        }
    }

    /// Look up the statistics for a station, if this table has seen it
    pub fn get(&self, hash: u32, key: &[u8]) -> Option<&Accumulator> {
        let mut index = hash as usize & self.mask;
        for _ in 0..self.slots.len() {
            match &self.slots[index] {
                Some(slot) if slot.matches(hash, key) => return Some(&slot.stats),
                Some(_) => index = (index + 1) & self.mask,
                None => return None,
            }
        }
        None
    }

    /// Iterate over `(key, stats)` for every occupied slot, in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Accumulator)> {
        self.slots
            .iter()
            .flatten()
            .map(|slot| (&*slot.key, &slot.stats))
    }

    /// Find the slot holding `key`, or the first free slot on its probe path
    #[inline]
    fn probe(&self, hash: u32, key: &[u8]) -> Result<usize> {
        let mut index = hash as usize & self.mask;
        for _ in 0..self.slots.len() {
            match &self.slots[index] {
                Some(slot) if !slot.matches(hash, key) => index = (index + 1) & self.mask,
                _ => return Ok(index),
            }
        }
        Err(AggregatorError::TableFull {
            capacity: self.slots.len(),
        })
    }
}
