//! Backing stores for [`SourceCache`](super::SourceCache).
//!
//! A store is a plain key → [`CacheEntry`] mapping. The cache decides
//! freshness; stores only read and write.

use crate::error::CacheStoreError;
use crate::models::CacheEntry;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, instrument};
use url::form_urlencoded::byte_serialize;

/// Read/write access to persisted cache entries.
pub trait CacheStore {
    /// Read the entry stored under `key`, `None` when nothing is stored.
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>, CacheStoreError>;

    /// Create or overwrite the entry stored under `key`.
    async fn save(&mut self, key: &str, entry: &CacheEntry) -> Result<(), CacheStoreError>;
}

/// In-process store, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, CacheEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl CacheStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>, CacheStoreError> {
        Ok(self.entries.get(key).cloned())
    }

    async fn save(&mut self, key: &str, entry: &CacheEntry) -> Result<(), CacheStoreError> {
        self.entries.insert(key.to_string(), entry.clone());
        Ok(())
    }
}

/// Store keeping one JSON file per key inside a directory.
///
/// Files are named after the form-urlencoded key, so distinct keys never
/// share a file. Each file holds the raw value and the fetched-at timestamp.
/// Writes go to a
/// temporary file first and are renamed into place, so a reader never sees a
/// half-written entry.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = byte_serialize(key.as_bytes()).collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl CacheStore for FileStore {
    #[instrument(level = "debug", skip(self))]
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>, CacheStoreError> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No cache file");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let entry: CacheEntry = serde_json::from_str(&raw)?;
        Ok(Some(entry))
    }

    #[instrument(level = "debug", skip(self, entry), fields(fetched_at = entry.fetched_at))]
    async fn save(&mut self, key: &str, entry: &CacheEntry) -> Result<(), CacheStoreError> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string(entry)?;
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &path).await?;
        debug!(path = %path.display(), "Wrote cache file");
        Ok(())
    }
}
