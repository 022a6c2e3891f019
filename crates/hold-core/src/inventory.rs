//! The stored-item multiset.
//!
//! Pure value type; the authoritative copy lives inside the host's store
//! worker and every mutation goes through its single replace funnel. Replicas
//! hold the same type read-only.

use std::cmp::Ordering;

use crate::catalog::ItemCatalog;
use crate::record::ItemRecord;

/// Ordered-for-display, otherwise unordered multiset of [`ItemRecord`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    records: Vec<ItemRecord>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ItemRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of record values. Widened so a hold full of high-value scrap
    /// cannot overflow.
    pub fn total_value(&self) -> i64 {
        self.records.iter().map(|record| i64::from(record.value)).sum()
    }

    /// Defensive copy ordered by display name, then value.
    ///
    /// Kinds missing from the catalog sort after known ones, by kind id, so
    /// the order stays deterministic even with stale content files.
    pub fn sorted(&self, catalog: &dyn ItemCatalog) -> Vec<ItemRecord> {
        let mut copy = self.records.clone();
        copy.sort_by(|a, b| {
            let name_a = catalog.definition(a.kind).map(|def| def.name.as_str());
            let name_b = catalog.definition(b.kind).map(|def| def.name.as_str());
            match (name_a, name_b) {
                (Some(na), Some(nb)) => na.cmp(nb).then(a.value.cmp(&b.value)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.kind.cmp(&b.kind).then(a.value.cmp(&b.value)),
            }
        });
        copy
    }

    /// Selects up to `count` records for withdrawal. Never mutates.
    ///
    /// `count == 1` matches at most one structurally-equal record;
    /// `count > 1` matches by kind only, supporting "withdraw N of this
    /// kind" without exact value/state matches.
    pub fn take(&self, matching: ItemRecord, count: usize) -> Vec<ItemRecord> {
        match count {
            0 => Vec::new(),
            1 => self
                .records
                .iter()
                .find(|record| **record == matching)
                .copied()
                .into_iter()
                .collect(),
            _ => self
                .records
                .iter()
                .filter(|record| record.kind == matching.kind)
                .take(count)
                .copied()
                .collect(),
        }
    }

    /// Swaps in new contents, returning `(old_len, new_len)` for the
    /// caller's delta log.
    pub fn replace(&mut self, new: Vec<ItemRecord>) -> (usize, usize) {
        let old_len = self.records.len();
        self.records = new;
        (old_len, self.records.len())
    }

    /// Current contents plus one record.
    pub fn with_record(&self, record: ItemRecord) -> Vec<ItemRecord> {
        let mut next = self.records.clone();
        next.push(record);
        next
    }

    /// Current contents with the first structural match of each given
    /// record removed.
    pub fn without_each(&self, records: &[ItemRecord]) -> Vec<ItemRecord> {
        let mut next = self.records.clone();
        for record in records {
            if let Some(index) = next.iter().position(|existing| existing == record) {
                next.remove(index);
            }
        }
        next
    }
}
