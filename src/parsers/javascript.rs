use anyhow::Result;
use std::path::Path;

use super::common::{RecordExtractor, TreeSitterParser};
use super::LanguageParser;
use crate::core::FileRecord;

/// JavaScript, JSX included (`.js`, `.jsx`, `.mjs`, `.cjs`).
pub struct JavaScriptParser;

impl JavaScriptParser {
    pub fn new() -> Result<Self> {
        // Fail early if the grammar cannot be loaded.
        TreeSitterParser::new(tree_sitter_javascript::language())?;
        Ok(Self)
    }
}

impl LanguageParser for JavaScriptParser {
    fn parse_source(&self, file_path: &Path, source: &str) -> Result<FileRecord> {
        let mut parser = TreeSitterParser::new(tree_sitter_javascript::language())?;
        let tree = parser.parse_source(source, file_path)?;
        let record = RecordExtractor::new(file_path, source).extract(&tree.root_node());
        Ok(record)
    }

    fn language_name(&self) -> &str {
        "javascript"
    }
}
