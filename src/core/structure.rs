use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::path;
use super::FileIndex;

/// One analyzed file under its directory in the project listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureEntry {
    pub file_name: String,
    pub file_path: String,
}

/// Directory → files it directly contains, in index order. Files at the top of
/// the tree are listed under `/`.
pub fn project_structure(index: &FileIndex) -> BTreeMap<String, Vec<StructureEntry>> {
    let mut structure: BTreeMap<String, Vec<StructureEntry>> = BTreeMap::new();

    for record in index.records() {
        let normalized = path::normalize(&record.path);
        let dir = match path::parent_dir(&normalized) {
            dir if dir.is_empty() => "/".to_string(),
            dir => dir,
        };
        let file_name = normalized
            .rsplit('/')
            .next()
            .unwrap_or(normalized.as_str())
            .to_string();

        structure.entry(dir).or_default().push(StructureEntry {
            file_name,
            file_path: record.path.clone(),
        });
    }

    structure
}
