use std::collections::HashMap;
use tracing::warn;

use super::path::normalize;
use super::FileRecord;

/// Read-only lookup over every record of one analysis run.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    records: Vec<FileRecord>,
    by_path: HashMap<String, usize>,
    by_normalized: HashMap<String, usize>,
}

impl FileIndex {
    pub fn build(records: Vec<FileRecord>) -> Self {
        let mut by_path = HashMap::with_capacity(records.len());
        let mut by_normalized = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            by_path.entry(record.path.clone()).or_insert(position);

            let key = normalize(&record.path);
            if let Some(&first) = by_normalized.get(&key) {
                let kept: &FileRecord = &records[first];
                warn!(
                    normalized = %key,
                    kept = %kept.path,
                    ignored = %record.path,
                    "two files normalize to the same path; keeping the first"
                );
                continue;
            }
            by_normalized.insert(key, position);
        }

        Self {
            records,
            by_path,
            by_normalized,
        }
    }

    /// Canonical path of the record whose normalized path equals `candidate`.
    pub fn lookup(&self, candidate: &str) -> Option<&str> {
        self.by_normalized
            .get(&normalize(candidate))
            .map(|&position| self.records[position].path.as_str())
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.by_path
            .get(path)
            .map(|&position| &self.records[position])
    }

    /// Records in ingestion order.
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
