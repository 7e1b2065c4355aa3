use std::collections::HashMap;
use std::slice::Iter;

/// One row of the position ledger
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub name: String,
    pub distance: f64,
}

/// A custom data structure used as the race's position ledger.
/// Entries keep the order they were first inserted in, while name
/// lookups still go through the associated HashMap.
#[derive(Debug, Default)]
pub struct PositionLedger {
    entries: Vec<LedgerEntry>,
    index: HashMap<String, usize>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Inserts a vehicle at the end of the ledger.
    /// An existing entry keeps its slot and only has its distance replaced.
    pub fn insert(&mut self, name: &str, distance: f64) {
        match self.index.get(name) {
            Some(&slot) => self.entries[slot].distance = distance,
            None => {
                self.index.insert(String::from(name), self.entries.len());
                self.entries.push(LedgerEntry {
                    name: String::from(name),
                    distance,
                });
            }
        }
    }

    /// Raises the entry for `name` to `distance`. Entries never go down,
    /// so a lower value is ignored. Returns false for unknown names.
    pub fn advance(&mut self, name: &str, distance: f64) -> bool {
        match self.index.get(name) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                if distance > entry.distance {
                    entry.distance = distance;
                }
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.index.get(name).map(|&slot| self.entries[slot].distance)
    }

    /// 1-based slot of `name` in the ledger
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|slot| slot + 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, LedgerEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a PositionLedger {
    type Item = &'a LedgerEntry;
    type IntoIter = Iter<'a, LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
