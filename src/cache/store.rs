//! Generation-scoped filesystem store for cached responses.
//!
//! Layout under the cache root:
//!
//! ```text
//! <root>/<generation>/index.json        key -> entry file + size, provisioned flag
//! <root>/<generation>/<hash16>.bin      postcard-encoded Response
//! ```
//!
//! Entry and index writes go through a write-temp-then-rename so a reader
//! never observes a torn file. A corrupt or missing entry file degrades to
//! a miss rather than an error; the serve path treats the store as
//! best-effort.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::fetch::Response;

const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    file: String,
    size: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheIndex {
    /// Set only after every manifest entry landed; an interrupted provision
    /// leaves the generation unprovisioned.
    provisioned: bool,
    entries: HashMap<String, IndexEntry>,
}

/// Entry count and total stored bytes for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub total_bytes: u64,
}

/// One cache generation on disk.
#[derive(Debug)]
pub struct CacheStore {
    generation: String,
    dir: PathBuf,
    index: CacheIndex,
}

impl CacheStore {
    /// Open (creating if needed) the generation directory under `root` and
    /// load its index.
    pub fn open(root: &Path, generation: &str) -> Result<Self> {
        let dir = root.join(generation);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create cache generation dir {:?}", dir))?;

        let index_path = dir.join(INDEX_FILE);
        let index = if index_path.exists() {
            let raw = fs::read_to_string(&index_path)
                .with_context(|| format!("failed to read cache index {:?}", index_path))?;
            match serde_json::from_str(&raw) {
                Ok(index) => index,
                Err(err) => {
                    warn!("cache index {:?} is corrupt, starting empty: {}", index_path, err);
                    CacheIndex::default()
                }
            }
        } else {
            CacheIndex::default()
        };

        Ok(Self {
            generation: generation.to_string(),
            dir,
            index,
        })
    }

    pub fn generation(&self) -> &str {
        &self.generation
    }

    /// Stable entry file name derived from the request path.
    fn entry_file_name(path: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(path.as_bytes());
        let hash = format!("{:x}", hasher.finalize());
        format!("{}.bin", &hash[..16])
    }

    /// Write bytes to `target` atomically via a sibling temp file.
    fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
        let temp_name = format!(
            "{}.tmp.{}",
            target
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("entry"),
            std::process::id()
        );
        let temp = target.with_file_name(temp_name);

        fs::write(&temp, bytes)
            .with_context(|| format!("failed to write cache temp file {:?}", temp))?;
        if let Err(err) = fs::rename(&temp, target) {
            let _ = fs::remove_file(&temp);
            return Err(err)
                .with_context(|| format!("failed to move cache file into place at {:?}", target));
        }
        Ok(())
    }

    fn persist_index(&self) -> Result<()> {
        let raw = serde_json::to_vec_pretty(&self.index).context("failed to encode cache index")?;
        Self::write_atomic(&self.dir.join(INDEX_FILE), &raw)
    }

    /// Store a response under the request path key.
    pub fn put(&mut self, path: &str, response: &Response) -> Result<()> {
        let file = Self::entry_file_name(path);
        let bytes = postcard::to_allocvec(response)
            .with_context(|| format!("failed to encode cache entry for {}", path))?;
        Self::write_atomic(&self.dir.join(&file), &bytes)?;

        self.index.entries.insert(
            path.to_string(),
            IndexEntry {
                file,
                size: bytes.len() as u64,
            },
        );
        self.persist_index()
    }

    /// Look up a stored response. Corrupt or vanished entries count as a
    /// miss; the bad index record is dropped so the next read-through
    /// repopulates it.
    pub fn get(&mut self, path: &str) -> Option<Response> {
        let entry = self.index.entries.get(path)?;
        let file = self.dir.join(&entry.file);

        let bytes = match fs::read(&file) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("cache entry {:?} unreadable, treating as miss: {}", file, err);
                self.evict(path);
                return None;
            }
        };

        match postcard::from_bytes(&bytes) {
            Ok(response) => Some(response),
            Err(err) => {
                warn!("cache entry {:?} corrupt, treating as miss: {}", file, err);
                self.evict(path);
                None
            }
        }
    }

    fn evict(&mut self, path: &str) {
        if let Some(entry) = self.index.entries.remove(path) {
            let _ = fs::remove_file(self.dir.join(entry.file));
            if let Err(err) = self.persist_index() {
                warn!("failed to persist cache index after eviction: {:#}", err);
            }
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.entries.contains_key(path)
    }

    pub fn is_provisioned(&self) -> bool {
        self.index.provisioned
    }

    /// Flip the provisioned flag. Called once, after the full manifest landed.
    pub fn mark_provisioned(&mut self) -> Result<()> {
        self.index.provisioned = true;
        self.persist_index()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.index.entries.len(),
            total_bytes: self.index.entries.values().map(|e| e.size).sum(),
        }
    }

    /// Names of every generation directory under `root`.
    pub fn list_generations(root: &Path) -> Result<Vec<String>> {
        if !root.exists() {
            return Ok(Vec::new());
        }
        let mut generations = Vec::new();
        for entry in fs::read_dir(root)
            .with_context(|| format!("failed to list cache root {:?}", root))?
        {
            let entry = entry.context("failed to read cache root entry")?;
            if entry.path().is_dir() {
                generations.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        generations.sort();
        Ok(generations)
    }

    /// Remove one generation directory and everything in it.
    pub fn delete_generation(root: &Path, generation: &str) -> Result<()> {
        let dir = root.join(generation);
        fs::remove_dir_all(&dir)
            .with_context(|| format!("failed to delete stale cache generation {:?}", dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::fetch::Response;
    use tempfile::TempDir;

    #[test]
    fn put_then_get_returns_the_stored_response() {
        let root = TempDir::new().unwrap();
        let mut store = CacheStore::open(root.path(), "v1").unwrap();

        let response = Response::ok("body bytes").with_header("content-type", "text/css");
        store.put("/styles.css", &response).unwrap();

        assert!(store.contains("/styles.css"));
        assert_eq!(store.get("/styles.css"), Some(response));
        assert!(!store.contains("/app.js"));
        assert_eq!(store.get("/app.js"), None);
    }

    #[test]
    fn index_survives_reopen() {
        let root = TempDir::new().unwrap();
        {
            let mut store = CacheStore::open(root.path(), "v1").unwrap();
            store.put("/index.html", &Response::ok("<html>")).unwrap();
            store.mark_provisioned().unwrap();
        }

        let mut reopened = CacheStore::open(root.path(), "v1").unwrap();
        assert!(reopened.is_provisioned());
        assert_eq!(reopened.get("/index.html"), Some(Response::ok("<html>")));
    }

    #[test]
    fn corrupt_entry_degrades_to_a_miss_and_is_evicted() {
        let root = TempDir::new().unwrap();
        let mut store = CacheStore::open(root.path(), "v1").unwrap();
        store.put("/app.js", &Response::ok("console.log()")).unwrap();

        let file = root
            .path()
            .join("v1")
            .join(CacheStore::entry_file_name("/app.js"));
        fs::write(&file, b"\xff\xff not postcard").unwrap();

        assert_eq!(store.get("/app.js"), None);
        assert!(!store.contains("/app.js"));
    }

    #[test]
    fn generations_are_listed_and_deleted_by_name() {
        let root = TempDir::new().unwrap();
        CacheStore::open(root.path(), "v1").unwrap();
        CacheStore::open(root.path(), "v2").unwrap();

        assert_eq!(
            CacheStore::list_generations(root.path()).unwrap(),
            vec!["v1".to_string(), "v2".to_string()]
        );

        CacheStore::delete_generation(root.path(), "v1").unwrap();
        assert_eq!(
            CacheStore::list_generations(root.path()).unwrap(),
            vec!["v2".to_string()]
        );
    }

    #[test]
    fn stats_track_entry_count_and_bytes() {
        let root = TempDir::new().unwrap();
        let mut store = CacheStore::open(root.path(), "v1").unwrap();
        assert_eq!(store.stats().entries, 0);

        store.put("/a", &Response::ok("aaaa")).unwrap();
        store.put("/b", &Response::ok("bb")).unwrap();

        let stats = store.stats();
        assert_eq!(stats.entries, 2);
        assert!(stats.total_bytes > 0);
    }
}
