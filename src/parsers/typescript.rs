use anyhow::Result;
use std::path::Path;
use tree_sitter::Language;

use super::common::{RecordExtractor, TreeSitterParser};
use super::LanguageParser;
use crate::core::FileRecord;

/// TypeScript; `.tsx` files go through the TSX grammar.
pub struct TypeScriptParser;

impl TypeScriptParser {
    pub fn new() -> Result<Self> {
        TreeSitterParser::new(tree_sitter_typescript::language_typescript())?;
        Ok(Self)
    }

    fn language_for(file_path: &Path) -> Language {
        match file_path.extension().and_then(|ext| ext.to_str()) {
            Some("tsx") => tree_sitter_typescript::language_tsx(),
            _ => tree_sitter_typescript::language_typescript(),
        }
    }
}

impl LanguageParser for TypeScriptParser {
    fn parse_source(&self, file_path: &Path, source: &str) -> Result<FileRecord> {
        let mut parser = TreeSitterParser::new(Self::language_for(file_path))?;
        let tree = parser.parse_source(source, file_path)?;
        let record = RecordExtractor::new(file_path, source).extract(&tree.root_node());
        Ok(record)
    }

    fn language_name(&self) -> &str {
        "typescript"
    }
}
