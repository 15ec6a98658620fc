pub mod analyzer;
pub mod attribution;
pub mod closure;
pub mod graph;
pub mod hierarchy;
pub mod index;
pub mod path;
pub mod record;
pub mod scanner;
pub mod structure;
pub mod summary;

pub use analyzer::{Analysis, AnalyzerOptions, CodebaseAnalyzer};
pub use attribution::attribute;
pub use closure::closure;
pub use graph::{DependencyEdge, DependencyGraph, GraphBuilder, ImportEdge, UnresolvedImport};
pub use hierarchy::{project, project_all, HierarchyNode, ProjectionMode};
pub use index::FileIndex;
pub use record::{load_records, parse_records, CallRef, FileRecord, ImportRef, IngestError, Symbol};
pub use scanner::FileScanner;
pub use structure::{project_structure, StructureEntry};
pub use summary::{summarize, DependencyUsage, FileSummary};
