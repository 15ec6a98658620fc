use anyhow::{Context, Result};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::debug;

use crate::core::FileRecord;

const DEFAULT_MAX_MEMORY_ENTRIES: usize = 1000;

/// An extracted record plus the file stamp it was extracted from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedRecord {
    pub record: FileRecord,
    pub timestamp: u64,
    pub file_size: u64,
}

/// Thread-safe record cache with memory and (best-effort) disk storage
pub struct ParseCache {
    memory_cache: DashMap<PathBuf, CachedRecord>,
    cache_dir: Option<PathBuf>,
    max_memory_entries: usize,
}

impl ParseCache {
    /// Cache backed by `cache_dir` (a `depscope_cache` dir under the system temp
    /// dir when unset). Fails if the directory cannot be created.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let cache_dir =
            cache_dir.unwrap_or_else(|| std::env::temp_dir().join("depscope_cache"));
        fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache dir {}", cache_dir.display()))?;

        Ok(Self {
            memory_cache: DashMap::with_capacity(DEFAULT_MAX_MEMORY_ENTRIES),
            cache_dir: Some(cache_dir),
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
        })
    }

    /// Build an in-memory-only cache without touching the filesystem
    pub fn in_memory_only() -> Self {
        Self {
            memory_cache: DashMap::with_capacity(DEFAULT_MAX_MEMORY_ENTRIES),
            cache_dir: None,
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
        }
    }

    /// Whether the file changed (mtime or size) since it was cached, or was never cached.
    pub fn needs_update(&self, file_path: &Path) -> Result<bool> {
        let (current_timestamp, current_size) = file_stamp(file_path)?;

        if let Some(entry) = self.memory_cache.get(file_path) {
            return Ok(entry.timestamp != current_timestamp || entry.file_size != current_size);
        }

        if let Some(cache_path) = self.cache_path(file_path) {
            if cache_path.exists() {
                if let Ok(entry) = self.load_from_disk(&cache_path) {
                    return Ok(
                        entry.timestamp != current_timestamp || entry.file_size != current_size
                    );
                }
            }
        }

        Ok(true)
    }

    pub fn get(&self, file_path: &Path) -> Option<FileRecord> {
        if let Some(entry) = self.memory_cache.get(file_path) {
            return Some(entry.record.clone());
        }

        let cache_path = self.cache_path(file_path)?;
        let entry = self.load_from_disk(&cache_path).ok()?;
        let record = entry.record.clone();

        if self.memory_cache.len() < self.max_memory_entries {
            self.memory_cache.insert(file_path.to_path_buf(), entry);
        }

        Some(record)
    }

    /// Cached record if the file is unchanged since it was stored.
    pub fn get_fresh(&self, file_path: &Path) -> Option<FileRecord> {
        match self.needs_update(file_path) {
            Ok(false) => self.get(file_path),
            Ok(true) => None,
            Err(err) => {
                debug!(file = %file_path.display(), error = %err, "cache check failed");
                None
            }
        }
    }

    pub fn store(&self, file_path: &Path, record: &FileRecord) -> Result<()> {
        let (timestamp, file_size) = file_stamp(file_path)?;

        let entry = CachedRecord {
            record: record.clone(),
            timestamp,
            file_size,
        };

        if self.memory_cache.len() >= self.max_memory_entries {
            if let Some(evicted) = self.memory_cache.iter().next() {
                let key = evicted.key().clone();
                drop(evicted);
                self.memory_cache.remove(&key);
            }
        }

        if let Some(cache_path) = self.cache_path(file_path) {
            self.store_to_disk(&cache_path, &entry)?;
        }
        self.memory_cache.insert(file_path.to_path_buf(), entry);

        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.memory_cache.clear();
        if let Some(cache_dir) = &self.cache_dir {
            if cache_dir.exists() {
                fs::remove_dir_all(cache_dir)?;
                fs::create_dir_all(cache_dir)?;
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            memory_entries: self.memory_cache.len(),
            disk_entries: self.disk_entry_count(),
        }
    }

    fn cache_path(&self, file_path: &Path) -> Option<PathBuf> {
        let cache_dir = self.cache_dir.as_ref()?;

        let mut hasher = DefaultHasher::new();
        file_path.hash(&mut hasher);
        let hash = hasher.finish();

        Some(cache_dir.join(format!("record_{:x}.bincode", hash)))
    }

    fn load_from_disk(&self, cache_path: &Path) -> Result<CachedRecord> {
        let data = fs::read(cache_path)?;
        let entry: CachedRecord = bincode::deserialize(&data)
            .with_context(|| format!("Corrupt cache entry {}", cache_path.display()))?;
        Ok(entry)
    }

    fn store_to_disk(&self, cache_path: &Path, entry: &CachedRecord) -> Result<()> {
        let data = bincode::serialize(entry)?;
        fs::write(cache_path, data)?;
        Ok(())
    }

    fn disk_entry_count(&self) -> usize {
        self.cache_dir
            .as_ref()
            .and_then(|dir| fs::read_dir(dir).ok())
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub disk_entries: usize,
}

fn file_stamp(file_path: &Path) -> Result<(u64, u64)> {
    let metadata = fs::metadata(file_path)?;
    let timestamp = metadata
        .modified()?
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    Ok((timestamp, metadata.len()))
}
