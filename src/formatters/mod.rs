pub mod json;
pub mod mermaid;

pub use json::JsonFormatter;
pub use mermaid::MermaidFormatter;
