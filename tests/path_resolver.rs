use depscope::core::path::{normalize, parent_dir, resolve};

#[test]
fn relative_specifiers_join_onto_the_importing_directory() {
    assert_eq!(
        resolve("src/components", "./Header.js").as_deref(),
        Some("src/components/Header.js")
    );
    assert_eq!(
        resolve("src/components", "../utils/api.js").as_deref(),
        Some("src/utils/api.js")
    );
    assert_eq!(resolve("", "./main.js").as_deref(), Some("main.js"));
    assert_eq!(resolve("src", "../../shared.js").as_deref(), Some("../shared.js"));
}

#[test]
fn bare_and_absolute_specifiers_are_not_resolved() {
    for specifier in ["react", "@scope/pkg", "lodash/fp", "/abs/file.js", ""] {
        assert_eq!(resolve("src", specifier), None, "{specifier}");
    }
}

#[test]
fn surrounding_quotes_are_stripped() {
    assert_eq!(resolve("src", "'./a.js'").as_deref(), Some("src/a.js"));
    assert_eq!(resolve("src", "\"./a.js\"").as_deref(), Some("src/a.js"));
    assert_eq!(resolve("src", "'react'"), None);
}

#[test]
fn separator_style_does_not_change_the_result() {
    let forward = resolve("src/components", "../utils/api.js");
    let backward = resolve("src\\components", "..\\utils\\api.js");
    assert_eq!(forward, backward);

    // repeated calls are stable
    assert_eq!(forward, resolve("src/components", "../utils/api.js"));
}

#[test]
fn normalize_collapses_dots_and_separators() {
    assert_eq!(normalize("./a//b/./c"), "a/b/c");
    assert_eq!(normalize("a/b/../c"), "a/c");
    assert_eq!(normalize("a/.."), ".");
    assert_eq!(normalize("."), ".");
    assert_eq!(normalize("../../x"), "../../x");
    assert_eq!(normalize("/proj/src/../../../x.js"), "/x.js");
    assert_eq!(normalize(".\\src\\index.js"), "src/index.js");
}

#[test]
fn parent_dir_of_normalized_paths() {
    assert_eq!(parent_dir("src/index.js"), "src");
    assert_eq!(parent_dir("./src/app/App.js"), "src/app");
    assert_eq!(parent_dir("index.js"), "");
    assert_eq!(parent_dir("/index.js"), "/");
}
