use depscope::core::{
    closure, parse_records, project, project_all, project_structure, AnalyzerOptions,
    CodebaseAnalyzer, ProjectionMode,
};
use depscope::formatters::{JsonFormatter, MermaidFormatter};
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, code: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, code).unwrap();
}

fn sample_app(root: &Path) {
    write(
        root,
        "src/index.js",
        "import { render } from './App.jsx';\nimport React from 'react';\nrender();\n",
    );
    write(
        root,
        "src/App.jsx",
        "import { fetchUser } from './api/client.ts';\nimport './missing.js';\nexport function render() { fetchUser(); log(); return <div />; }\n",
    );
    write(
        root,
        "src/api/client.ts",
        "import { render } from '../App.jsx';\nexport function fetchUser(): void { log(); }\n",
    );
    write(root, "node_modules/react/index.js", "module.exports = {};\n");
}

fn analyzer() -> CodebaseAnalyzer {
    CodebaseAnalyzer::with_options(AnalyzerOptions {
        cache_dir: None,
        no_cache: true,
    })
}

#[test]
fn analyzer_end_to_end_on_a_small_app() {
    let dir = tempfile::TempDir::new().unwrap();
    sample_app(dir.path());

    let analysis = analyzer()
        .analyze(dir.path(), &["javascript", "typescript"])
        .unwrap();
    let graph = &analysis.graph;

    assert_eq!(
        graph.nodes().collect::<Vec<_>>(),
        vec!["src/App.jsx", "src/api/client.ts", "src/index.js"]
    );
    assert!(graph.has_edge("src/index.js", "src/App.jsx"));
    assert!(graph.has_edge("src/App.jsx", "src/api/client.ts"));
    assert!(graph.has_edge("src/api/client.ts", "src/App.jsx"));
    assert_eq!(graph.edge_count(), 3);
    assert_eq!(graph.unresolved().len(), 1);
    assert_eq!(graph.unresolved()[0].candidate, "src/missing.js");
    assert_eq!(graph.root_files(), vec!["src/index.js"]);

    assert_eq!(
        closure(graph, "src/index.js"),
        vec!["src/App.jsx", "src/api/client.ts"]
    );

    let tree = project(graph, &analysis.index, "src/index.js");
    let app = &tree.children["src/App.jsx"];
    let client = &app.children["src/api/client.ts"];
    assert!(client.children["src/App.jsx"].children.is_empty());
    assert_eq!(app.functions_used.iter().collect::<Vec<_>>(), vec!["log"]);

    let roots = project_all(graph, &analysis.index, ProjectionMode::RootsOnly);
    assert_eq!(roots.len(), 1);
}

#[test]
fn reports_render_from_an_analysis() {
    let dir = tempfile::TempDir::new().unwrap();
    sample_app(dir.path());
    let analysis = analyzer()
        .analyze(dir.path(), &["javascript", "typescript"])
        .unwrap();

    let out = dir.path().join("graph.mmd");
    MermaidFormatter::new()
        .format_to_file(&analysis.graph, &analysis.index, &out)
        .unwrap();
    let mermaid = fs::read_to_string(&out).unwrap();
    assert!(mermaid.starts_with("graph TD"));
    assert!(mermaid.contains("src/api/client.ts"));

    let json = JsonFormatter::new().format_graph(&analysis.graph).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["edges"].as_array().unwrap().len(), 3);
}

#[test]
fn analyze_rejects_a_file_as_root() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("single.js");
    fs::write(&file, "go();\n").unwrap();

    assert!(analyzer().analyze(&file, &["javascript"]).is_err());
}

#[test]
fn cached_second_run_matches_the_first() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = dir.path().join("app");
    sample_app(&app);

    let options = AnalyzerOptions {
        cache_dir: Some(dir.path().join("cache")),
        no_cache: false,
    };
    let first = CodebaseAnalyzer::with_options(options.clone())
        .analyze(&app, &["javascript", "typescript"])
        .unwrap();
    let second = CodebaseAnalyzer::with_options(options)
        .analyze(&app, &["javascript", "typescript"])
        .unwrap();

    assert_eq!(first.graph.edges(), second.graph.edges());
    assert_eq!(
        first.index.records().collect::<Vec<_>>(),
        second.index.records().collect::<Vec<_>>()
    );
}

#[test]
fn dumped_records_rebuild_the_same_graph() {
    let dir = tempfile::TempDir::new().unwrap();
    sample_app(dir.path());
    let scanned = analyzer()
        .analyze(dir.path(), &["javascript", "typescript"])
        .unwrap();

    let dump = dir.path().join("records.json");
    fs::write(&dump, JsonFormatter::new().format_records(&scanned.index).unwrap()).unwrap();

    let records = parse_records(&fs::read_to_string(&dump).unwrap()).unwrap();
    let reloaded = CodebaseAnalyzer::from_records(records);

    assert_eq!(
        reloaded.graph.nodes().collect::<Vec<_>>(),
        scanned.graph.nodes().collect::<Vec<_>>()
    );
    assert_eq!(reloaded.graph.edges(), scanned.graph.edges());
    assert_eq!(reloaded.graph.unresolved(), scanned.graph.unresolved());
    assert_eq!(
        reloaded.index.records().collect::<Vec<_>>(),
        scanned.index.records().collect::<Vec<_>>()
    );
}

#[test]
fn structure_lists_files_per_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    sample_app(dir.path());
    write(dir.path(), "main.ts", "boot();\n");
    let analysis = analyzer()
        .analyze(dir.path(), &["javascript", "typescript"])
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(
        &JsonFormatter::compact()
            .format_structure(&project_structure(&analysis.index))
            .unwrap(),
    )
    .unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "/": [{ "file_name": "main.ts", "file_path": "main.ts" }],
            "src": [
                { "file_name": "App.jsx", "file_path": "src/App.jsx" },
                { "file_name": "index.js", "file_path": "src/index.js" }
            ],
            "src/api": [{ "file_name": "client.ts", "file_path": "src/api/client.ts" }]
        })
    );
}

#[test]
fn unusable_cache_dir_falls_back_to_memory() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = dir.path().join("app");
    sample_app(&app);
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let analysis = CodebaseAnalyzer::with_options(AnalyzerOptions {
        cache_dir: Some(blocker.join("cache")),
        no_cache: false,
    })
    .analyze(&app, &["javascript", "typescript"])
    .unwrap();

    assert_eq!(analysis.graph.edge_count(), 3);
    assert!(!blocker.join("cache").exists());
}
