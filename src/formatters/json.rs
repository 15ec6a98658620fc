use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::core::{DependencyGraph, FileIndex, FileSummary, HierarchyNode, StructureEntry};

/// JSON output for graphs, closures, hierarchies, summaries, records and the
/// project listing.
pub struct JsonFormatter {
    /// Indented output instead of a single line
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// `{ "nodes": [...], "edges": [[from, to], ...] }`
    pub fn format_graph(&self, graph: &DependencyGraph) -> Result<String> {
        self.render(graph)
    }

    pub fn format_closure(&self, closure: &[String]) -> Result<String> {
        self.render(&closure)
    }

    pub fn format_hierarchy(&self, node: &HierarchyNode) -> Result<String> {
        self.render(node)
    }

    pub fn format_hierarchies(&self, trees: &BTreeMap<String, HierarchyNode>) -> Result<String> {
        self.render(trees)
    }

    pub fn format_summaries(&self, summaries: &BTreeMap<String, FileSummary>) -> Result<String> {
        self.render(summaries)
    }

    /// Every record in index order, readable again by `parse_records`.
    pub fn format_records(&self, index: &FileIndex) -> Result<String> {
        let records: Vec<_> = index.records().collect();
        self.render(&records)
    }

    pub fn format_structure(
        &self,
        structure: &BTreeMap<String, Vec<StructureEntry>>,
    ) -> Result<String> {
        self.render(structure)
    }

    pub fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(rendered)
    }

    pub fn write_to_file<T: Serialize + ?Sized>(&self, value: &T, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.render(value)?)?;
        Ok(())
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}
