use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{DependencyGraph, FileIndex, FileRecord, FileScanner};
use crate::parsers::{cache::ParseCache, ParserFactory};

/// Settings that shape one analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerOptions {
    /// Disk cache location; the system temp dir when unset.
    pub cache_dir: Option<PathBuf>,
    /// Keep the cache in memory only.
    pub no_cache: bool,
}

/// The immutable result of an analysis run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub index: FileIndex,
    pub graph: DependencyGraph,
}

pub struct CodebaseAnalyzer {
    file_scanner: FileScanner,
    parser_factory: ParserFactory,
    parse_cache: ParseCache,
}

impl CodebaseAnalyzer {
    pub fn new() -> Self {
        Self::with_options(AnalyzerOptions::default())
    }

    pub fn with_options(options: AnalyzerOptions) -> Self {
        let parse_cache = if options.no_cache {
            ParseCache::in_memory_only()
        } else {
            ParseCache::new(options.cache_dir).unwrap_or_else(|err| {
                warn!(
                    error = %format!("{err:#}"),
                    "disk parse cache unavailable; continuing in memory"
                );
                ParseCache::in_memory_only()
            })
        };

        Self {
            file_scanner: FileScanner::new(),
            parser_factory: ParserFactory::new(),
            parse_cache,
        }
    }

    /// Scan `root_path`, extract a record per file and build the graph.
    /// Record paths are relative to `root_path` and use `/` separators.
    pub fn analyze(&mut self, root_path: &Path, languages: &[&str]) -> Result<Analysis> {
        if !root_path.is_dir() {
            anyhow::bail!("Input path is not a directory: {}", root_path.display());
        }

        let files = self
            .file_scanner
            .scan_directory(root_path, languages)
            .with_context(|| format!("Failed to scan {}", root_path.display()))?;
        info!(files = files.len(), root = %root_path.display(), "scanned source tree");

        let parser_factory = &self.parser_factory;
        let parse_cache = &self.parse_cache;

        let outcomes: Vec<(Option<FileRecord>, bool)> = files
            .par_iter()
            .map(|file_info| {
                if let Some(record) = parse_cache.get_fresh(&file_info.path) {
                    return (Some(record), true);
                }

                let parser = match parser_factory.get_parser(&file_info.language) {
                    Ok(parser) => parser,
                    Err(err) => {
                        warn!(file = %file_info.path.display(), error = %err, "no parser");
                        return (None, false);
                    }
                };

                match parser.parse_file(&file_info.path) {
                    Ok(record) => {
                        if let Err(err) = parse_cache.store(&file_info.path, &record) {
                            warn!(file = %file_info.path.display(), error = %err, "failed to cache record");
                        }
                        (Some(record), false)
                    }
                    Err(err) => {
                        warn!(file = %file_info.path.display(), error = %err, "failed to parse; skipping");
                        (None, false)
                    }
                }
            })
            .collect();

        let cached = outcomes.iter().filter(|(_, hit)| *hit).count();
        let mut records: Vec<FileRecord> = files
            .iter()
            .zip(outcomes)
            .filter_map(|(file_info, (record, _))| {
                record.map(|mut record| {
                    record.path = relative_key(root_path, &file_info.path);
                    record
                })
            })
            .collect();
        records.sort_by(|a, b| a.path.cmp(&b.path));

        info!(
            records = records.len(),
            cache_hits = cached,
            parsed = records.len().saturating_sub(cached),
            "extracted file records"
        );

        Ok(Self::from_records(records))
    }

    /// Build the index and graph from records produced elsewhere.
    pub fn from_records(records: Vec<FileRecord>) -> Analysis {
        let index = FileIndex::build(records);
        let graph = DependencyGraph::build(&index);
        Analysis { index, graph }
    }
}

impl Default for CodebaseAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn relative_key(root: &Path, file: &Path) -> String {
    file.strip_prefix(root)
        .unwrap_or(file)
        .to_string_lossy()
        .replace('\\', "/")
}
