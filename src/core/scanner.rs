use anyhow::Result;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: PathBuf,
    pub language: String,
    pub extension: String,
}

pub struct FileScanner {
    skip_dirs: Vec<String>,
}

impl FileScanner {
    pub fn new() -> Self {
        Self {
            skip_dirs: vec!["node_modules".to_string(), ".git".to_string()],
        }
    }

    /// Directory names never descended into.
    pub fn with_skip_dirs(mut self, dirs: Vec<String>) -> Self {
        self.skip_dirs = dirs;
        self
    }

    pub fn scan_directory(&self, root_path: &Path, languages: &[&str]) -> Result<Vec<FileInfo>> {
        let supported_extensions = self.get_extensions_for_languages(languages);

        let entries: Vec<_> = WalkDir::new(root_path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !self.is_skipped(entry.file_name().to_str().unwrap_or(""))
            })
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .collect();

        let files: Vec<FileInfo> = entries
            .par_iter()
            .filter_map(|entry| {
                let path = entry.path();
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(|extension| {
                        supported_extensions
                            .get(extension)
                            .map(|language| FileInfo {
                                path: path.to_path_buf(),
                                language: language.to_string(),
                                extension: extension.to_string(),
                            })
                    })
            })
            .collect();

        Ok(files)
    }

    fn is_skipped(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|dir| dir == name)
    }

    fn get_extensions_for_languages(&self, languages: &[&str]) -> HashMap<&'static str, &'static str> {
        let mut extensions = HashMap::with_capacity(languages.len() * 4);

        for &language in languages {
            match language {
                "typescript" | "ts" => {
                    extensions.insert("ts", "typescript");
                    extensions.insert("tsx", "typescript");
                    extensions.insert("mts", "typescript");
                    extensions.insert("cts", "typescript");
                }
                "javascript" | "js" => {
                    extensions.insert("js", "javascript");
                    extensions.insert("jsx", "javascript");
                    extensions.insert("mjs", "javascript");
                    extensions.insert("cjs", "javascript");
                }
                _ => {}
            }
        }

        extensions
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}
