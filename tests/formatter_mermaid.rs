use depscope::core::{DependencyGraph, FileIndex, FileRecord};
use depscope::formatters::MermaidFormatter;

fn analysis(records: Vec<FileRecord>) -> (FileIndex, DependencyGraph) {
    let index = FileIndex::build(records);
    let graph = DependencyGraph::build(&index);
    (index, graph)
}

#[test]
fn mermaid_labels_edges_with_shared_calls() {
    let (index, graph) = analysis(vec![
        FileRecord::new("src/app.js")
            .with_import("./api.js")
            .with_import("./theme.js")
            .with_call("get")
            .with_call("post"),
        FileRecord::new("src/api.js").with_call("post").with_call("get"),
        FileRecord::new("src/theme.js"),
    ]);

    let out = MermaidFormatter::new().format(&graph, &index);

    assert_eq!(
        out,
        "graph TD\n\
         \x20   f0[\"src/app.js\"]\n\
         \x20   f1[\"src/api.js\"]\n\
         \x20   f2[\"src/theme.js\"]\n\
         \x20   f0 -->|\"get, post\"| f1\n\
         \x20   f0 --> f2\n"
    );
}

#[test]
fn fenced_output_and_quote_escaping() {
    let (index, graph) = analysis(vec![FileRecord::new("weird\"name.js")]);

    let out = MermaidFormatter::new().with_fence(true).format(&graph, &index);

    assert!(out.starts_with("```mermaid\ngraph TD\n"));
    assert!(out.contains("f0[\"weird#quot;name.js\"]"));
    assert!(out.ends_with("```\n"));
}

#[test]
fn multi_line_callees_stay_on_one_label_line() {
    let (index, graph) = analysis(vec![
        FileRecord::new("a.js")
            .with_import("./b.js")
            .with_call("api\n  .get"),
        FileRecord::new("b.js").with_call("api\n  .get"),
    ]);

    let out = MermaidFormatter::new().format(&graph, &index);

    assert!(out.contains("    f0 -->|\"api .get\"| f1\n"));
    assert_eq!(out.lines().count(), 4);
}
