//! Paper record caching.
//!
//! The fetcher consults a cache before going to the network and stores
//! successful lookups afterwards. Three implementations are provided: a
//! JSON-file store for real runs, an in-memory store for tests and
//! embedding, and a no-op store for cache-disabled runs.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::CacheError;
use crate::types::{PaperId, PaperRecord};

/// Storage interface consulted by the fetcher.
pub trait PaperCache: Send + Sync {
    /// Look up a record. `Ok(None)` means a miss.
    fn get(&self, id: &PaperId) -> Result<Option<PaperRecord>, CacheError>;

    /// Store a record, overwriting any previous entry for its id.
    fn put(&self, record: &PaperRecord) -> Result<(), CacheError>;
}

// ── No-op cache ──────────────────────────────────────────────────────────────

/// Cache that stores nothing. Used when caching is disabled.
#[derive(Debug, Default)]
pub struct NoopCache;

impl PaperCache for NoopCache {
    fn get(&self, _id: &PaperId) -> Result<Option<PaperRecord>, CacheError> {
        Ok(None)
    }

    fn put(&self, _record: &PaperRecord) -> Result<(), CacheError> {
        Ok(())
    }
}

// ── In-memory cache ──────────────────────────────────────────────────────────

/// Process-local cache backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<PaperId, PaperRecord>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl PaperCache for MemoryCache {
    fn get(&self, id: &PaperId) -> Result<Option<PaperRecord>, CacheError> {
        Ok(self.entries.lock().unwrap().get(id).cloned())
    }

    fn put(&self, record: &PaperRecord) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        Ok(())
    }
}

// ── JSON file cache ──────────────────────────────────────────────────────────

/// Durable cache writing one pretty-printed JSON file per paper.
///
/// Writes go through a temp file and rename so a crashed run never
/// leaves a half-written entry behind.
#[derive(Debug)]
pub struct JsonFileCache {
    dir: PathBuf,
}

impl JsonFileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, id: &PaperId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl PaperCache for JsonFileCache {
    fn get(&self, id: &PaperId) -> Result<Option<PaperRecord>, CacheError> {
        load_json(&self.entry_path(id))
    }

    fn put(&self, record: &PaperRecord) -> Result<(), CacheError> {
        atomic_write_json(&self.entry_path(&record.id), record)
    }
}

fn atomic_write_json(path: &Path, record: &PaperRecord) -> Result<(), CacheError> {
    let json = serde_json::to_string_pretty(record)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn load_json(path: &Path) -> Result<Option<PaperRecord>, CacheError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}
