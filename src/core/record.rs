use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One import occurrence: the raw specifier plus the statement it came from.
///
/// `line` is not written by every extractor and defaults to 0; every other field
/// must be present when a record is ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRef {
    #[serde(alias = "module")]
    pub specifier: String,
    pub content: String,
    #[serde(default)]
    pub line: usize,
}

/// One call expression, keyed by the text of its callee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRef {
    #[serde(alias = "function")]
    pub callee: String,
    pub content: String,
    #[serde(default)]
    pub line: usize,
}

/// A named declaration (function or export) with its source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    #[serde(alias = "function", alias = "export")]
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub line: usize,
}

/// Everything the extractor knows about one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(alias = "file")]
    pub path: String,
    pub imports: Vec<ImportRef>,
    pub functions: Vec<Symbol>,
    #[serde(alias = "function_calls")]
    pub calls: Vec<CallRef>,
    pub exports: Vec<Symbol>,
    #[serde(default)]
    pub arrow_functions: usize,
    #[serde(default)]
    pub jsx_elements: usize,
}

impl FileRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            imports: Vec::new(),
            functions: Vec::new(),
            calls: Vec::new(),
            exports: Vec::new(),
            arrow_functions: 0,
            jsx_elements: 0,
        }
    }

    pub fn with_import(mut self, specifier: &str) -> Self {
        self.imports.push(ImportRef {
            specifier: specifier.to_string(),
            content: format!("import '{specifier}';"),
            line: 0,
        });
        self
    }

    pub fn with_function(mut self, name: &str) -> Self {
        self.functions.push(Symbol {
            name: name.to_string(),
            content: String::new(),
            line: 0,
        });
        self
    }

    pub fn with_call(mut self, callee: &str) -> Self {
        self.calls.push(CallRef {
            callee: callee.to_string(),
            content: format!("{callee}()"),
            line: 0,
        });
        self
    }

    pub fn with_export(mut self, name: &str) -> Self {
        self.exports.push(Symbol {
            name: name.to_string(),
            content: String::new(),
            line: 0,
        });
        self
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|f| f.name.as_str())
    }

    pub fn callee_names(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().map(|c| c.callee.as_str())
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read records from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("records document is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),
    #[error("records document must be an array or an object keyed by path")]
    UnsupportedShape,
    #[error("malformed file record at {position}")]
    MalformedRecord {
        position: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("file record at {position} has an empty path")]
    MissingPath { position: String },
    #[error("duplicate file record for {path}")]
    DuplicatePath { path: String },
}

pub fn load_records(path: &Path) -> Result<Vec<FileRecord>, IngestError> {
    let data = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(&data)
}

/// Accepts either `[record, ...]` or `{ "path": record, ... }`. Every record is
/// validated before any is returned.
pub fn parse_records(json: &str) -> Result<Vec<FileRecord>, IngestError> {
    let document: Value = serde_json::from_str(json).map_err(IngestError::InvalidJson)?;

    let records = match document {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| decode_record(format!("index {i}"), item))
            .collect::<Result<Vec<_>, _>>()?,
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, mut item)| {
                if let Value::Object(fields) = &mut item {
                    if !fields.contains_key("path") && !fields.contains_key("file") {
                        fields.insert("path".to_string(), Value::String(key.clone()));
                    }
                }
                decode_record(format!("key {key:?}"), item)
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(IngestError::UnsupportedShape),
    };

    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.path.as_str()) {
            return Err(IngestError::DuplicatePath {
                path: record.path.clone(),
            });
        }
    }

    Ok(records)
}

fn decode_record(position: String, mut item: Value) -> Result<FileRecord, IngestError> {
    // Older extractor output lists every arrow function and JSX element
    // snippet; only their number is kept.
    if let Value::Object(fields) = &mut item {
        for key in ["arrow_functions", "jsx_elements"] {
            let count = match fields.get(key) {
                Some(Value::Array(snippets)) => snippets.len(),
                _ => continue,
            };
            fields.insert(key.to_string(), Value::from(count));
        }
    }

    let record: FileRecord = serde_json::from_value(item).map_err(|source| {
        IngestError::MalformedRecord {
            position: position.clone(),
            source,
        }
    })?;
    if record.path.trim().is_empty() {
        return Err(IngestError::MissingPath { position });
    }
    Ok(record)
}
