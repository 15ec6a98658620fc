use std::collections::{BTreeSet, HashSet};

use super::FileRecord;

/// Names `dependent` calls that are also called somewhere inside `dependency`.
///
/// Call sites, not declarations, are the signal, and matching is by name only:
/// two unrelated functions that share a name in different files are reported
/// as related. Consumers rely on this looser recall, so it is not a symbol
/// binding.
pub fn attribute(dependent: &FileRecord, dependency: &FileRecord) -> BTreeSet<String> {
    let called_in_dependency: HashSet<&str> = dependency.callee_names().collect();

    dependent
        .callee_names()
        .filter(|name| called_in_dependency.contains(name))
        .map(str::to_string)
        .collect()
}

/// Same match as [`attribute`], kept in the dependent's call order with
/// repeats removed.
pub fn attribute_ordered(dependent: &FileRecord, dependency: &FileRecord) -> Vec<String> {
    let called_in_dependency: HashSet<&str> = dependency.callee_names().collect();
    let mut seen = HashSet::new();

    dependent
        .callee_names()
        .filter(|name| called_in_dependency.contains(name) && seen.insert(*name))
        .map(str::to_string)
        .collect()
}
