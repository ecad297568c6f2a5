use parking_lot::RwLock;
use std::collections::HashMap;

use crate::model::{CityKey, CurrentConditions};

#[derive(Debug, Default)]
struct Entries {
    index: HashMap<CityKey, usize>,
    items: Vec<(CityKey, CurrentConditions)>,
}

/// Latest current conditions per city.
///
/// Entries keep the position of their first insertion; a later `put` for the
/// same key replaces the value in place. Nothing is ever removed.
#[derive(Debug, Default)]
pub struct CityCache {
    entries: RwLock<Entries>,
}

impl CityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: CityKey, conditions: CurrentConditions) {
        let mut entries = self.entries.write();
        if let Some(&pos) = entries.index.get(&key) {
            entries.items[pos].1 = conditions;
            return;
        }

        let pos = entries.items.len();
        entries.index.insert(key.clone(), pos);
        entries.items.push((key, conditions));
    }

    pub fn get(&self, key: &CityKey) -> Option<CurrentConditions> {
        let entries = self.entries.read();
        entries.index.get(key).map(|&pos| entries.items[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every committed entry, in insertion order.
    pub fn snapshot(&self) -> Vec<(CityKey, CurrentConditions)> {
        self.entries.read().items.clone()
    }
}
