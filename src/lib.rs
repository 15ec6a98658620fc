//! # depscope
//!
//! File-level dependency analysis for JavaScript and TypeScript source trees.
//!
//! depscope extracts imports, exports, function declarations and call sites from
//! each file, resolves relative imports into a directed dependency graph, and
//! projects that graph into per-file hierarchies annotated with the functions a
//! file uses from each dependency.
//!
//! ## Outputs
//!
//! - **Graph**: `{ "nodes": [...], "edges": [[from, to], ...] }`
//! - **Closure**: every file transitively imported by one file
//! - **Hierarchy**: nested trees per root file (or per file), cycles cut by
//!   terminal markers
//! - **Summary**: per-file imports, calls and functions used from each dependency
//! - **Mermaid**: flowchart with attributed functions on the edges
//!
//! Package imports (`react`, `lodash/fp`) are never resolved; they stay external.

pub mod core;
pub mod formatters;
pub mod parsers;
