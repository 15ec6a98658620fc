pub mod cache;
pub mod common;
pub mod javascript;
pub mod typescript;

use anyhow::Result;
use std::path::Path;

use crate::core::FileRecord;

pub trait LanguageParser {
    /// Extract a record from source text already in memory.
    fn parse_source(&self, file_path: &Path, source: &str) -> Result<FileRecord>;

    fn parse_file(&self, file_path: &Path) -> Result<FileRecord> {
        let source = common::read_source(file_path)?;
        self.parse_source(file_path, &source)
    }

    fn language_name(&self) -> &str;
}

pub struct ParserFactory;

impl ParserFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn get_parser(&self, language: &str) -> Result<Box<dyn LanguageParser + Send + Sync>> {
        match language {
            "typescript" => Ok(Box::new(typescript::TypeScriptParser::new()?)),
            "javascript" => Ok(Box::new(javascript::JavaScriptParser::new()?)),
            _ => anyhow::bail!("Unsupported language: {}", language),
        }
    }
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}
