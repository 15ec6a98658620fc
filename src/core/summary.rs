use serde::Serialize;
use std::collections::BTreeMap;

use super::attribution::attribute_ordered;
use super::closure::{closure, is_direct};
use super::path;
use super::{DependencyGraph, FileIndex, UnresolvedImport};

/// A file in another file's closure and the calls that reach into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyUsage {
    pub file: String,
    pub direct: bool,
    #[serde(rename = "functionsUsed")]
    pub functions_used: Vec<String>,
}

/// Per-file function-call summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub imports: Vec<String>,
    pub calls: Vec<String>,
    pub dependencies: Vec<DependencyUsage>,
    pub external: Vec<String>,
    pub unresolved: Vec<UnresolvedImport>,
}

pub fn summarize_file(graph: &DependencyGraph, index: &FileIndex, file: &str) -> Option<FileSummary> {
    let record = index.get(file)?;

    let dependencies = closure(graph, file)
        .into_iter()
        .map(|dep| {
            let functions_used = index
                .get(&dep)
                .map(|dependency| attribute_ordered(record, dependency))
                .unwrap_or_default();
            DependencyUsage {
                direct: is_direct(graph, file, &dep),
                file: dep,
                functions_used,
            }
        })
        .collect();

    let external = record
        .imports
        .iter()
        .map(|import| path::strip_quotes(&import.specifier))
        .filter(|specifier| !path::is_relative(specifier))
        .map(str::to_string)
        .collect();

    Some(FileSummary {
        imports: record.imports.iter().map(|i| i.specifier.clone()).collect(),
        calls: record.callee_names().map(str::to_string).collect(),
        dependencies,
        external,
        unresolved: graph.unresolved_from(file).cloned().collect(),
    })
}

pub fn summarize(graph: &DependencyGraph, index: &FileIndex) -> BTreeMap<String, FileSummary> {
    index
        .records()
        .filter_map(|record| {
            summarize_file(graph, index, &record.path).map(|summary| (record.path.clone(), summary))
        })
        .collect()
}
