//! LRU Tracker Module
//!
//! Access-time map used to pick eviction batches.

use std::collections::HashMap;

// == LRU Tracker ==
/// Records the last access of every key as a logical tick.
///
/// Ticks increase monotonically, so the smallest tick is the least recently
/// used key. Ties cannot occur.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Key -> tick of its last access
    ticks: HashMap<String, u64>,
    /// Next tick to hand out
    clock: u64,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as the most recently used.
    pub fn touch(&mut self, key: &str) {
        self.clock += 1;
        match self.ticks.get_mut(key) {
            Some(tick) => *tick = self.clock,
            None => {
                self.ticks.insert(key.to_string(), self.clock);
            }
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.ticks.remove(key);
    }

    // == Oldest ==
    /// Returns up to `n` keys, least recently used first.
    pub fn oldest(&self, n: usize) -> Vec<String> {
        let mut by_age: Vec<(&String, u64)> =
            self.ticks.iter().map(|(key, tick)| (key, *tick)).collect();
        by_age.sort_unstable_by_key(|(_, tick)| *tick);
        by_age
            .into_iter()
            .take(n)
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.ticks.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.ticks.clear();
    }
}
