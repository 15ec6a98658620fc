use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction, Graph};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use tracing::{debug, info};

use super::path;
use super::{FileIndex, ImportRef};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
}

/// Every import statement that produced one logical file-to-file edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportEdge {
    pub imports: Vec<ImportRef>,
}

/// A relative import whose normalized candidate matched no indexed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedImport {
    pub from: String,
    pub specifier: String,
    pub candidate: String,
}

pub type FileGraph = Graph<String, ImportEdge, Directed>;

pub struct GraphBuilder {
    graph: FileGraph,
    node_map: HashMap<String, NodeIndex>,
    unresolved: Vec<UnresolvedImport>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            node_map: HashMap::new(),
            unresolved: Vec::new(),
        }
    }

    /// Adds `path` once; later calls return the existing index.
    pub fn add_node(&mut self, path: &str) -> NodeIndex {
        if let Some(&index) = self.node_map.get(path) {
            return index;
        }
        let index = self.graph.add_node(path.to_string());
        self.node_map.insert(path.to_string(), index);
        index
    }

    /// Adds the import to the `from -> to` edge, creating the edge on first use.
    /// Returns `None` when either endpoint is not a node.
    pub fn add_edge(&mut self, from: &str, to: &str, import: ImportRef) -> Option<EdgeIndex> {
        let source_idx = *self.node_map.get(from)?;
        let target_idx = *self.node_map.get(to)?;

        if let Some(existing) = self.graph.find_edge(source_idx, target_idx) {
            if let Some(weight) = self.graph.edge_weight_mut(existing) {
                weight.imports.push(import);
            }
            return Some(existing);
        }

        Some(self.graph.add_edge(
            source_idx,
            target_idx,
            ImportEdge {
                imports: vec![import],
            },
        ))
    }

    pub fn add_unresolved(&mut self, unresolved: UnresolvedImport) {
        self.unresolved.push(unresolved);
    }

    pub fn build(self) -> DependencyGraph {
        DependencyGraph {
            graph: self.graph,
            node_map: self.node_map,
            unresolved: self.unresolved,
        }
    }

    pub fn get_node_index(&self, path: &str) -> Option<NodeIndex> {
        self.node_map.get(path).copied()
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// File-level dependency graph. May contain cycles.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: FileGraph,
    node_map: HashMap<String, NodeIndex>,
    unresolved: Vec<UnresolvedImport>,
}

impl DependencyGraph {
    pub fn build(index: &FileIndex) -> Self {
        let mut builder = GraphBuilder::new();

        for record in index.records() {
            builder.add_node(&record.path);
        }

        let mut external = 0usize;
        for record in index.records() {
            let base_dir = path::parent_dir(&record.path);

            for import in &record.imports {
                let Some(candidate) = path::resolve(&base_dir, &import.specifier) else {
                    external += 1;
                    continue;
                };

                match index.lookup(&candidate) {
                    Some(target) => {
                        builder.add_edge(&record.path, target, import.clone());
                    }
                    None => {
                        debug!(
                            file = %record.path,
                            specifier = %import.specifier,
                            candidate = %candidate,
                            "relative import did not match any indexed file"
                        );
                        builder.add_unresolved(UnresolvedImport {
                            from: record.path.clone(),
                            specifier: import.specifier.clone(),
                            candidate,
                        });
                    }
                }
            }
        }

        let graph = builder.build();
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            unresolved = graph.unresolved.len(),
            external,
            "dependency graph built"
        );
        graph
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(|idx| self.graph[idx].as_str())
    }

    /// Logical edges in the order they were first seen.
    pub fn edges(&self) -> Vec<DependencyEdge> {
        self.graph
            .edge_references()
            .map(|edge| DependencyEdge {
                from: self.graph[edge.source()].clone(),
                to: self.graph[edge.target()].clone(),
            })
            .collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.node_map.contains_key(path)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn dependencies_of(&self, path: &str) -> Vec<&str> {
        self.neighbors(path, Direction::Outgoing)
    }

    pub fn dependents_of(&self, path: &str) -> Vec<&str> {
        self.neighbors(path, Direction::Incoming)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_map.get(from), self.node_map.get(to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// The import statements behind the `from -> to` edge; empty if there is none.
    pub fn imports_between(&self, from: &str, to: &str) -> &[ImportRef] {
        let (Some(&a), Some(&b)) = (self.node_map.get(from), self.node_map.get(to)) else {
            return &[];
        };
        self.graph
            .find_edge(a, b)
            .and_then(|edge| self.graph.edge_weight(edge))
            .map(|weight| weight.imports.as_slice())
            .unwrap_or(&[])
    }

    /// Files nothing else imports, in node order.
    pub fn root_files(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx].as_str())
            .collect()
    }

    pub fn unresolved(&self) -> &[UnresolvedImport] {
        &self.unresolved
    }

    pub fn unresolved_from(&self, path: &str) -> impl Iterator<Item = &UnresolvedImport> {
        let path = path.to_string();
        self.unresolved.iter().filter(move |u| u.from == path)
    }

    pub(crate) fn node_index(&self, path: &str) -> Option<NodeIndex> {
        self.node_map.get(path).copied()
    }

    pub(crate) fn path_of(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Outgoing neighbours in edge-creation order. petgraph walks adjacency
    /// lists newest first, so the edges are re-sorted by index.
    pub(crate) fn outgoing(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.ordered_neighbors(idx, Direction::Outgoing)
    }

    fn ordered_neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self.graph.edges_directed(idx, direction).collect();
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .map(|edge| match direction {
                Direction::Outgoing => edge.target(),
                Direction::Incoming => edge.source(),
            })
            .collect()
    }

    fn neighbors(&self, path: &str, direction: Direction) -> Vec<&str> {
        match self.node_index(path) {
            Some(idx) => self
                .ordered_neighbors(idx, direction)
                .into_iter()
                .map(|n| self.path_of(n))
                .collect(),
            None => Vec::new(),
        }
    }
}

impl Serialize for DependencyGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes: Vec<&str> = self.nodes().collect();
        let edges: Vec<(&str, &str)> = self
            .graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].as_str(),
                    self.graph[edge.target()].as_str(),
                )
            })
            .collect();

        let mut state = serializer.serialize_struct("DependencyGraph", 2)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &edges)?;
        state.end()
    }
}

