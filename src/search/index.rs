//! Sorted symbol index and the slot that owns the current snapshot.

use crate::error::LookupError;
use crate::record::{Category, RawEntry, SymbolRecord, normalize};
use ahash::{AHashMap, AHashSet};
use std::cmp::Ordering;
use std::sync::Arc;

/// Counts produced while building a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Records present in the snapshot.
    pub indexed: usize,
    /// Raw entries rejected by the normalizer.
    pub dropped: usize,
    /// Records collapsed into an identical earlier record.
    pub duplicates: usize,
}

/// An immutable, queryable view of the built index.
///
/// Records are sorted by search key, then category priority, then owner name,
/// then original input order. Per-category lists keep input order.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    records: Vec<SymbolRecord>,
    /// Positions into `records`, in input order.
    by_category: AHashMap<Category, Vec<usize>>,
    report: BuildReport,
    generation: u64,
}

impl IndexSnapshot {
    /// Builds a snapshot from already normalized records.
    pub fn build(records: impl IntoIterator<Item = SymbolRecord>) -> Self {
        Self::assemble(records, 0, 0)
    }

    /// Normalizes raw entries and builds a snapshot, counting rejected entries.
    pub fn from_raw<'a>(entries: impl IntoIterator<Item = &'a RawEntry>) -> Self {
        let mut dropped = 0;
        let records: Vec<SymbolRecord> = entries
            .into_iter()
            .filter_map(|raw| match normalize(raw) {
                Ok(record) => Some(record),
                Err(rejection) => {
                    dropped += 1;
                    tracing::debug!("Dropping search-index entry: {}", rejection);
                    None
                }
            })
            .collect();

        if dropped > 0 {
            tracing::warn!("Dropped {} malformed search-index entries", dropped);
        }

        Self::assemble(records, dropped, 0)
    }

    fn assemble(
        records: impl IntoIterator<Item = SymbolRecord>,
        dropped: usize,
        generation: u64,
    ) -> Self {
        let start = std::time::Instant::now();

        // Collapse full duplicates, keeping the first occurrence
        let mut unique: Vec<SymbolRecord> = Vec::new();
        let mut duplicates = 0;
        {
            let mut seen = AHashSet::new();
            for record in records {
                let identity = (record.kind().clone(), record.label().to_string());
                if seen.insert(identity) {
                    unique.push(record);
                } else {
                    duplicates += 1;
                }
            }
        }

        let mut by_category: AHashMap<Category, Vec<usize>> = AHashMap::new();
        let mut order: Vec<usize> = (0..unique.len()).collect();
        order.sort_by(|&a, &b| compare_for_index(&unique[a], &unique[b]).then(a.cmp(&b)));

        // `order[pos]` is the input ordinal of the record that lands at `pos`
        let mut sorted_position = vec![0; unique.len()];
        for (pos, &ordinal) in order.iter().enumerate() {
            sorted_position[ordinal] = pos;
        }
        for (ordinal, record) in unique.iter().enumerate() {
            by_category
                .entry(record.category())
                .or_default()
                .push(sorted_position[ordinal]);
        }

        let mut slots: Vec<Option<SymbolRecord>> = unique.into_iter().map(Some).collect();
        let records: Vec<SymbolRecord> = order
            .into_iter()
            .filter_map(|ordinal| slots[ordinal].take())
            .collect();

        let report = BuildReport {
            indexed: records.len(),
            dropped,
            duplicates,
        };

        tracing::info!(
            "Built symbol index: {} records ({} dropped, {} duplicates) in {:?}",
            report.indexed,
            report.dropped,
            report.duplicates,
            start.elapsed()
        );

        Self {
            records,
            by_category,
            report,
            generation,
        }
    }

    /// All records in sorted order.
    pub fn records(&self) -> &[SymbolRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SymbolRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one category, in input order.
    pub fn category(&self, category: Category) -> impl Iterator<Item = &SymbolRecord> + '_ {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&pos| &self.records[pos])
    }

    pub fn category_count(&self, category: Category) -> usize {
        self.by_category.get(&category).map_or(0, Vec::len)
    }

    pub const fn report(&self) -> BuildReport {
        self.report
    }

    /// Raw entries rejected while building this snapshot.
    pub const fn dropped(&self) -> usize {
        self.report.dropped
    }

    /// Rebuild counter of the slot that produced this snapshot; 0 if standalone.
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

impl<'a> IntoIterator for &'a IndexSnapshot {
    type Item = &'a SymbolRecord;
    type IntoIter = std::slice::Iter<'a, SymbolRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Index sort order, excluding the final input-order tie break.
fn compare_for_index(a: &SymbolRecord, b: &SymbolRecord) -> Ordering {
    a.search_key()
        .cmp(b.search_key())
        .then_with(|| a.category().priority().cmp(&b.category().priority()))
        .then_with(|| a.owner_name().cmp(&b.owner_name()))
}

/// Owner of the current snapshot.
///
/// Rebuilding swaps in a new `Arc`; anyone still holding the previous snapshot
/// keeps using it until they drop it.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    current: Option<Arc<IndexSnapshot>>,
    generation: u64,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot with one built from `entries`.
    pub fn rebuild<'a>(&mut self, entries: impl IntoIterator<Item = &'a RawEntry>) -> BuildReport {
        let snapshot = IndexSnapshot::from_raw(entries);
        self.install(snapshot)
    }

    /// Replaces the snapshot with one built from normalized records.
    pub fn rebuild_from_records(
        &mut self,
        records: impl IntoIterator<Item = SymbolRecord>,
    ) -> BuildReport {
        self.install(IndexSnapshot::build(records))
    }

    fn install(&mut self, mut snapshot: IndexSnapshot) -> BuildReport {
        self.generation += 1;
        snapshot.generation = self.generation;
        let report = snapshot.report;
        self.current = Some(Arc::new(snapshot));
        report
    }

    /// The current snapshot, or [`LookupError::NotBuilt`] before the first build.
    pub fn snapshot(&self) -> Result<Arc<IndexSnapshot>, LookupError> {
        self.current.clone().ok_or(LookupError::NotBuilt)
    }

    pub const fn is_built(&self) -> bool {
        self.current.is_some()
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }
}
