use depscope::core::{
    graph::GraphBuilder, DependencyEdge, DependencyGraph, FileIndex, FileRecord, ImportRef,
};
use serde_json::json;

fn import(specifier: &str) -> ImportRef {
    ImportRef {
        specifier: specifier.to_string(),
        content: format!("import x from '{specifier}';"),
        line: 1,
    }
}

fn build(records: Vec<FileRecord>) -> DependencyGraph {
    DependencyGraph::build(&FileIndex::build(records))
}

fn edge(from: &str, to: &str) -> DependencyEdge {
    DependencyEdge {
        from: from.to_string(),
        to: to.to_string(),
    }
}

#[test]
fn graph_builder_adds_nodes_and_edges() {
    let mut gb = GraphBuilder::new();

    let a = gb.add_node("a.js");
    gb.add_node("b.js");
    gb.add_node("c.js");
    assert_eq!(gb.add_node("a.js"), a);
    assert_eq!(gb.get_node_index("a.js"), Some(a));

    assert!(gb.add_edge("a.js", "b.js", import("./b.js")).is_some());
    assert!(gb.add_edge("b.js", "c.js", import("./c.js")).is_some());

    let graph = gb.build();
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn add_edge_returns_none_when_missing_nodes() {
    let mut gb = GraphBuilder::new();
    gb.add_node("a.js");

    assert!(gb.add_edge("a.js", "missing.js", import("./missing.js")).is_none());
}

#[test]
fn repeated_imports_collapse_into_one_edge() {
    let graph = build(vec![
        FileRecord::new("src/a.js")
            .with_import("./b.js")
            .with_import("'./b.js'")
            .with_import("../src/b.js"),
        FileRecord::new("src/b.js"),
    ]);

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.imports_between("src/a.js", "src/b.js").len(), 3);
    assert!(graph.imports_between("src/b.js", "src/a.js").is_empty());
}

#[test]
fn every_record_is_a_node_even_without_edges() {
    let graph = build(vec![
        FileRecord::new("src/a.js").with_import("react"),
        FileRecord::new("src/lonely.js"),
    ]);

    assert_eq!(graph.nodes().collect::<Vec<_>>(), vec!["src/a.js", "src/lonely.js"]);
    assert_eq!(graph.edge_count(), 0);
    assert!(graph.unresolved().is_empty());
}

#[test]
fn building_twice_yields_the_same_graph() {
    let records = vec![
        FileRecord::new("src/index.js")
            .with_import("./App.js")
            .with_import("./util/format.js"),
        FileRecord::new("src/App.js").with_import("./util/format.js"),
        FileRecord::new("src/util/format.js").with_import("../App.js"),
    ];

    let first = build(records.clone());
    let second = build(records);

    assert_eq!(first.nodes().collect::<Vec<_>>(), second.nodes().collect::<Vec<_>>());
    assert_eq!(first.edges(), second.edges());
    assert_eq!(
        first.edges(),
        vec![
            edge("src/index.js", "src/App.js"),
            edge("src/index.js", "src/util/format.js"),
            edge("src/App.js", "src/util/format.js"),
            edge("src/util/format.js", "src/App.js"),
        ]
    );
}

#[test]
fn unresolved_import_creates_no_edge_and_leaves_others_alone() {
    let base = vec![
        FileRecord::new("src/a.js").with_import("./b.js"),
        FileRecord::new("src/b.js").with_import("./c.js"),
        FileRecord::new("src/c.js"),
    ];
    let mut with_missing = base.clone();
    with_missing[0] = with_missing[0].clone().with_import("./missing");

    let clean = build(base);
    let graph = build(with_missing);

    assert_eq!(graph.edges(), clean.edges());
    assert_eq!(graph.unresolved().len(), 1);
    let unresolved = &graph.unresolved()[0];
    assert_eq!(unresolved.from, "src/a.js");
    assert_eq!(unresolved.specifier, "./missing");
    assert_eq!(unresolved.candidate, "src/missing");
}

#[test]
fn root_files_have_no_incoming_edges() {
    let graph = build(vec![
        FileRecord::new("A.js").with_import("./B.js"),
        FileRecord::new("B.js"),
        FileRecord::new("C.js").with_import("./B.js"),
    ]);

    assert_eq!(graph.root_files(), vec!["A.js", "C.js"]);
    assert_eq!(graph.dependents_of("B.js"), vec!["A.js", "C.js"]);
    assert_eq!(graph.dependencies_of("A.js"), vec!["B.js"]);
}

#[test]
fn self_import_is_an_edge_and_not_a_root() {
    let graph = build(vec![FileRecord::new("a.js").with_import("./a.js")]);

    assert!(graph.has_edge("a.js", "a.js"));
    assert!(graph.root_files().is_empty());
}

#[test]
fn serializes_as_node_and_edge_lists() {
    let graph = build(vec![
        FileRecord::new("src/a.js").with_import("./b.js"),
        FileRecord::new("src/b.js"),
    ]);

    let value = serde_json::to_value(&graph).unwrap();
    assert_eq!(
        value,
        json!({
            "nodes": ["src/a.js", "src/b.js"],
            "edges": [["src/a.js", "src/b.js"]]
        })
    );
}
