//! Import specifier resolution.
//!
//! Paths are handled as `/`-separated strings so that a tree extracted on
//! Windows and one extracted on Unix produce the same keys.

const QUOTES: &[char] = &['\'', '"', '`'];

/// Resolve a relative import specifier against the importing file's directory.
///
/// Bare specifiers (`react`, `@scope/pkg`) are package imports and resolve to
/// `None`. The returned path is only a candidate: it may not exist in the index.
pub fn resolve(base_dir: &str, specifier: &str) -> Option<String> {
    let specifier = strip_quotes(specifier);
    if !is_relative(specifier) {
        return None;
    }

    if base_dir.is_empty() {
        return Some(normalize(specifier));
    }
    Some(normalize(&format!("{base_dir}/{specifier}")))
}

/// Drops quote characters left around a specifier copied from source text.
pub fn strip_quotes(specifier: &str) -> &str {
    specifier.trim().trim_matches(QUOTES)
}

pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with('.')
}

/// Lexical normalization: unify separators, drop `.` and empty segments, fold
/// `..` into its parent where one exists.
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // `/..` is `/`
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Directory part of a normalized path; empty for a bare file name.
pub fn parent_dir(path: &str) -> String {
    let normalized = normalize(path);
    match normalized.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => normalized[..idx].to_string(),
        None => String::new(),
    }
}
