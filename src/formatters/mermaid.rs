use anyhow::Result;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::core::{attribute, DependencyGraph, FileIndex};

/// Renders the dependency graph as a Mermaid flowchart. Each edge is labelled
/// with the functions attributed to it.
pub struct MermaidFormatter {
    /// Wrap the diagram in a ```mermaid fence for markdown viewers
    fenced: bool,
}

impl MermaidFormatter {
    pub fn new() -> Self {
        Self { fenced: false }
    }

    pub fn with_fence(mut self, fenced: bool) -> Self {
        self.fenced = fenced;
        self
    }

    pub fn format(&self, graph: &DependencyGraph, index: &FileIndex) -> String {
        let mut ids: HashMap<&str, String> = HashMap::with_capacity(graph.node_count());
        let mut out = String::new();

        if self.fenced {
            out.push_str("```mermaid\n");
        }
        out.push_str("graph TD\n");

        for (i, file) in graph.nodes().enumerate() {
            let id = format!("f{i}");
            let _ = writeln!(out, "    {id}[\"{}\"]", escape(file));
            ids.insert(file, id);
        }

        for edge in graph.edges() {
            let (Some(from_id), Some(to_id)) = (ids.get(edge.from.as_str()), ids.get(edge.to.as_str()))
            else {
                continue;
            };

            let functions = match (index.get(&edge.from), index.get(&edge.to)) {
                (Some(dependent), Some(dependency)) => attribute(dependent, dependency)
                    .into_iter()
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => String::new(),
            };

            if functions.is_empty() {
                let _ = writeln!(out, "    {from_id} --> {to_id}");
            } else {
                let _ = writeln!(out, "    {from_id} -->|\"{}\"| {to_id}", escape(&functions));
            }
        }

        if self.fenced {
            out.push_str("```\n");
        }
        out
    }

    pub fn format_to_file(
        &self,
        graph: &DependencyGraph,
        index: &FileIndex,
        output_path: &Path,
    ) -> Result<()> {
        fs::write(output_path, self.format(graph, index))?;
        Ok(())
    }
}

impl Default for MermaidFormatter {
    fn default() -> Self {
        Self::new()
    }
}

// Callee text keeps the source layout (`api\n  .get`); a label must stay on one line.
fn escape(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('"', "#quot;")
}
