use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::attribution::attribute;
use super::{DependencyGraph, FileIndex};

/// One file in a projected dependency tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub file: String,
    #[serde(rename = "functionsUsed")]
    pub functions_used: BTreeSet<String>,
    pub children: BTreeMap<String, HierarchyNode>,
}

impl HierarchyNode {
    /// Stand-in for a file already on the path from the top-level root.
    pub fn cycle_terminal(file: &str) -> Self {
        Self {
            file: file.to_string(),
            functions_used: BTreeSet::new(),
            children: BTreeMap::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, markers included.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.values());
        }
        count
    }

    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(node.children.values().map(|child| (child, depth + 1)));
        }
        deepest
    }
}

// Dropping nested maps recurses once per level; unlink the subtree first so a
// long import chain is released without deep recursion.
impl Drop for HierarchyNode {
    fn drop(&mut self) {
        let mut pending: Vec<HierarchyNode> =
            std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// A tree for every file in the graph.
    AllFiles,
    /// Trees only for files nothing else imports.
    RootsOnly,
}

pub fn project(graph: &DependencyGraph, index: &FileIndex, root: &str) -> HierarchyNode {
    match graph.node_index(root) {
        Some(idx) => {
            let mut on_path = HashSet::new();
            build_node(graph, index, idx, &mut on_path)
        }
        None => HierarchyNode::cycle_terminal(root),
    }
}

pub fn project_all(
    graph: &DependencyGraph,
    index: &FileIndex,
    mode: ProjectionMode,
) -> BTreeMap<String, HierarchyNode> {
    let roots: Vec<&str> = match mode {
        ProjectionMode::AllFiles => graph.nodes().collect(),
        ProjectionMode::RootsOnly => graph.root_files(),
    };

    roots
        .par_iter()
        .map(|root| (root.to_string(), project(graph, index, root)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

// Post-order build with an explicit stack of open files. A node is finished
// once all of its outgoing edges are handled and is then handed to its parent.
fn build_node(
    graph: &DependencyGraph,
    index: &FileIndex,
    root: NodeIndex,
    on_path: &mut HashSet<NodeIndex>,
) -> HierarchyNode {
    on_path.insert(root);
    let mut stack = vec![OpenNode::new(graph, root)];

    loop {
        let Some(open) = stack.last_mut() else {
            break;
        };

        match open.pending.next() {
            Some(dep) => {
                let dep_file = graph.path_of(dep);
                let dependent = index.get(graph.path_of(open.node));
                if let (Some(dependent), Some(dependency)) = (dependent, index.get(dep_file)) {
                    open.functions_used.extend(attribute(dependent, dependency));
                }

                if on_path.contains(&dep) {
                    open.children
                        .insert(dep_file.to_string(), HierarchyNode::cycle_terminal(dep_file));
                } else {
                    on_path.insert(dep);
                    stack.push(OpenNode::new(graph, dep));
                }
            }
            None => {
                let Some(done) = stack.pop() else {
                    break;
                };
                on_path.remove(&done.node);
                let node = done.finish(graph, index);

                match stack.last_mut() {
                    Some(parent) => {
                        parent.children.insert(node.file.clone(), node);
                    }
                    None => return node,
                }
            }
        }
    }

    HierarchyNode::cycle_terminal(graph.path_of(root))
}

struct OpenNode {
    node: NodeIndex,
    pending: std::vec::IntoIter<NodeIndex>,
    functions_used: BTreeSet<String>,
    children: BTreeMap<String, HierarchyNode>,
}

impl OpenNode {
    fn new(graph: &DependencyGraph, node: NodeIndex) -> Self {
        Self {
            node,
            pending: graph.outgoing(node).into_iter(),
            functions_used: BTreeSet::new(),
            children: BTreeMap::new(),
        }
    }

    fn finish(self, graph: &DependencyGraph, index: &FileIndex) -> HierarchyNode {
        let file = graph.path_of(self.node);
        let mut functions_used = self.functions_used;

        if self.children.is_empty() {
            if let Some(record) = index.get(file) {
                functions_used.extend(record.function_names().map(str::to_string));
            }
        }

        HierarchyNode {
            file: file.to_string(),
            functions_used,
            children: self.children,
        }
    }
}
