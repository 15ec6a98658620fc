use std::collections::HashSet;

use super::DependencyGraph;

/// Every file reachable from `start`, in first-discovery order.
///
/// `start` itself is never part of the result, even when a cycle leads back to
/// it. A path that is not in the graph has an empty closure.
pub fn closure(graph: &DependencyGraph, start: &str) -> Vec<String> {
    let Some(start_idx) = graph.node_index(start) else {
        return Vec::new();
    };

    let mut visited = HashSet::new();
    visited.insert(start_idx);

    // One pending-neighbour iterator per open file, innermost on top. Chains
    // of imports are not bounded by the thread stack.
    let mut discovered = Vec::new();
    let mut stack = vec![graph.outgoing(start_idx).into_iter()];

    while let Some(pending) = stack.last_mut() {
        match pending.next() {
            Some(dep) => {
                if visited.insert(dep) {
                    discovered.push(dep);
                    stack.push(graph.outgoing(dep).into_iter());
                }
            }
            None => {
                stack.pop();
            }
        }
    }

    discovered
        .into_iter()
        .map(|idx| graph.path_of(idx).to_string())
        .collect()
}

/// Files `file` imports itself.
pub fn direct_dependencies(graph: &DependencyGraph, file: &str) -> Vec<String> {
    graph
        .dependencies_of(file)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Whether `dependency` is imported by `file` directly rather than only
/// reached through other files.
pub fn is_direct(graph: &DependencyGraph, file: &str, dependency: &str) -> bool {
    graph.has_edge(file, dependency)
}
