//! Persistent result cache keyed by filename and validated by content hash.
//!
//! The cache lets a re-run skip the remote call for every file whose bytes
//! have not changed since the last run. Staleness is detected by comparing a
//! streaming SHA-256 of the file's current bytes against the hash stored at
//! record time — not by modification time, so copies that preserve bytes but
//! change timestamps still hit.
//!
//! The store is a pure optimisation layer: every failure here (unreadable
//! cache file, malformed JSON, unhashable document) degrades to a miss or a
//! skipped record and is logged, never propagated. A broken cache must not
//! change the correctness of the analysis output.
//!
//! Ownership: one `CacheStore` per run, loaded at start, mutated in memory by
//! the single batch worker, persisted once at the end. Concurrent writers are
//! not supported.

use crate::document::{AnalysisResult, PdfDocument};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Well-known cache file name, stored inside the input directory.
pub const CACHE_FILENAME: &str = ".analysis_cache.json";

/// Chunk size for streaming file hashes.
const HASH_BUF_SIZE: usize = 8192;

/// One persisted analysis result plus the hash it is valid for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub filename: String,
    pub summary: String,
    pub key_entities: String,
    pub action_items: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub raw_response: String,
    #[serde(default)]
    pub error: Option<String>,
    /// Hex SHA-256 of the source file bytes at record time.
    pub file_hash: String,
    /// RFC 3339 timestamp of when the entry was recorded. Informational
    /// only — reuse is decided by `file_hash`, never by age.
    pub cached_at: String,
}

impl CacheEntry {
    fn to_result(&self) -> AnalysisResult {
        AnalysisResult {
            filename: self.filename.clone(),
            summary: self.summary.clone(),
            key_entities: self.key_entities.clone(),
            action_items: self.action_items.clone(),
            keywords: self.keywords.clone(),
            raw_response: self.raw_response.clone(),
            error: self.error.clone(),
        }
    }
}

/// In-memory mapping from document filename to its cached entry.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: BTreeMap<String, CacheEntry>,
}

impl CacheStore {
    /// Load the cache from `dir`, degrading to an empty store on any failure.
    ///
    /// A cold cache is always a valid starting state, so an absent,
    /// unreadable, or malformed cache file is a warning, not an error.
    pub fn load(dir: &Path) -> Self {
        let path = cache_path(dir);

        if !path.exists() {
            debug!("No cache file found at {}, starting fresh", path.display());
            return Self::default();
        }

        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to read cache file {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<BTreeMap<String, CacheEntry>>(&data) {
            Ok(entries) => {
                info!("Loaded {} cached results from {}", entries.len(), path.display());
                Self { entries }
            }
            Err(e) => {
                warn!("Failed to parse cache file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Persist the full mapping to `dir`, creating the directory if needed.
    ///
    /// Write failures are logged and swallowed — losing the cache costs a
    /// re-analysis on the next run, nothing more.
    pub fn save(&self, dir: &Path) {
        let path = cache_path(dir);

        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!("Failed to create cache directory {}: {}", dir.display(), e);
            return;
        }

        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialise cache: {}", e);
                return;
            }
        };

        match std::fs::write(&path, json) {
            Ok(()) => info!("Saved {} results to cache", self.entries.len()),
            Err(e) => warn!("Failed to save cache to {}: {}", path.display(), e),
        }
    }

    /// Return the cached result for `doc` if its file bytes are unchanged.
    ///
    /// The hit condition is strict: an entry must exist for `doc.filename`
    /// *and* its stored hash must equal a freshly computed hash of the
    /// backing file. A hashing error (file missing, unreadable) is a miss.
    pub fn lookup(&self, doc: &PdfDocument) -> Option<AnalysisResult> {
        let entry = self.entries.get(&doc.filename)?;

        let current_hash = match compute_file_hash(&doc.path) {
            Ok(hash) => hash,
            Err(e) => {
                debug!("Cache miss (hash failed) for {}: {}", doc.filename, e);
                return None;
            }
        };

        if entry.file_hash != current_hash {
            debug!("Cache miss (file changed): {}", doc.filename);
            return None;
        }

        debug!("Cache hit: {}", doc.filename);
        Some(entry.to_result())
    }

    /// Insert or overwrite the entry for `doc` with a fresh timestamp.
    ///
    /// If the file cannot be hashed the record is skipped; the cache stays
    /// stale for that document and the run continues.
    pub fn record(&mut self, doc: &PdfDocument, result: &AnalysisResult) {
        let file_hash = match compute_file_hash(&doc.path) {
            Ok(hash) => hash,
            Err(e) => {
                warn!("Failed to cache result for {}: {}", doc.filename, e);
                return;
            }
        };

        self.entries.insert(
            doc.filename.clone(),
            CacheEntry {
                filename: result.filename.clone(),
                summary: result.summary.clone(),
                key_entities: result.key_entities.clone(),
                action_items: result.action_items.clone(),
                keywords: result.keywords.clone(),
                raw_response: result.raw_response.clone(),
                error: result.error.clone(),
                file_hash,
                cached_at: chrono::Utc::now().to_rfc3339(),
            },
        );
    }

    /// Delete the persisted cache file inside `dir`.
    ///
    /// Returns whether a file was actually removed.
    pub fn clear(dir: &Path) -> bool {
        let path = cache_path(dir);
        if path.exists() {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    info!("Cache cleared");
                    true
                }
                Err(e) => {
                    warn!("Failed to clear cache {}: {}", path.display(), e);
                    false
                }
            }
        } else {
            false
        }
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn cache_path(dir: &Path) -> PathBuf {
    dir.join(CACHE_FILENAME)
}

/// Streaming SHA-256 of a file's full byte content, as a hex string.
///
/// Reads in fixed-size chunks so arbitrarily large PDFs never need to fit
/// in memory.
pub fn compute_file_hash(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; HASH_BUF_SIZE];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
