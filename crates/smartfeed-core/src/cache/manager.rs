use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::ContentItem;

const MINUTE_MS: i64 = 60_000;
const HOUR_MINUTES: i64 = 60;
const DAY_MINUTES: i64 = 1440;

/// Entries stamped further ahead than this are from a broken clock or a
/// hand-edited file and are not trusted.
const MAX_FUTURE_SKEW_MS: i64 = 24 * 60 * MINUTE_MS;

/// A block's payload as it was last fetched.
///
/// Both fields are required on disk; a file missing either one fails to
/// parse and is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Epoch milliseconds of the fetch
    pub timestamp: i64,
    pub payload: Vec<ContentItem>,
}

impl CacheEntry {
    pub fn new(payload: Vec<ContentItem>) -> Self {
        Self::at(Utc::now().timestamp_millis(), payload)
    }

    pub fn at(timestamp: i64, payload: Vec<ContentItem>) -> Self {
        Self { timestamp, payload }
    }

    /// Saturates instead of overflowing on out-of-range timestamps.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.timestamp)
    }

    pub fn age_display(&self, now_ms: i64) -> String {
        let minutes = self.age_ms(now_ms) / MINUTE_MS;
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < HOUR_MINUTES {
            format!("{}m ago", minutes)
        } else if minutes < DAY_MINUTES {
            let hours = minutes / HOUR_MINUTES;
            if minutes % HOUR_MINUTES >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / DAY_MINUTES;
            if (minutes % DAY_MINUTES) / HOUR_MINUTES >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed cache entry: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Cache entry timestamp out of range: {0}")]
    Timestamp(i64),
}

/// File-backed key/value store, one JSON document per key.
pub struct CacheStore {
    cache_dir: PathBuf,
}

impl CacheStore {
    /// Open a store rooted at `cache_dir`. A directory that can't be created
    /// only disables persistence; reads report absent and writes are dropped.
    pub fn new(cache_dir: PathBuf) -> Self {
        if let Err(e) = std::fs::create_dir_all(&cache_dir) {
            warn!(dir = %cache_dir.display(), error = %e, "Failed to create cache directory");
        }
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Keys become file names, so anything outside `[A-Za-z0-9_-]` is replaced.
    fn cache_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let path = self.cache_path(key);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let entry: CacheEntry = serde_json::from_str(&contents)?;
        Self::check_timestamp(entry.timestamp, Utc::now().timestamp_millis())?;
        Ok(Some(entry))
    }

    /// Timestamps must be representable dates and not meaningfully in the future.
    fn check_timestamp(timestamp: i64, now_ms: i64) -> Result<(), CacheError> {
        let representable = chrono::DateTime::<Utc>::from_timestamp_millis(timestamp).is_some();
        if !representable || timestamp > now_ms.saturating_add(MAX_FUTURE_SKEW_MS) {
            return Err(CacheError::Timestamp(timestamp));
        }
        Ok(())
    }

    /// Each write goes to its own temp file in the cache directory and is then
    /// renamed over the entry, so overlapping writers never share a temp file
    /// and readers only ever see a complete document. A failed rename drops
    /// the temp file, which deletes it.
    fn save(&self, key: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        let path = self.cache_path(key);
        let contents = serde_json::to_string_pretty(entry)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.cache_dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.persist(&path).map_err(|e| CacheError::Io(e.error))?;
        Ok(())
    }

    /// Read an entry. Missing, unreadable and malformed entries are all `None`.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        match self.load(key) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(cache = key, error = %e, "Ignoring unusable cache entry");
                None
            }
        }
    }

    /// Overwrite an entry. Failures are logged and otherwise ignored.
    pub fn set(&self, key: &str, entry: &CacheEntry) {
        match self.save(key, entry) {
            Ok(()) => debug!(cache = key, items = entry.payload.len(), "Cache updated"),
            Err(e) => warn!(cache = key, error = %e, "Failed to write cache entry"),
        }
    }

    /// Age label per key, `None` where nothing usable is cached.
    pub fn ages(&self, keys: &[String], now_ms: i64) -> Vec<(String, Option<String>)> {
        keys.iter()
            .map(|key| {
                let age = self.get(key).map(|entry| entry.age_display(now_ms));
                (key.clone(), age)
            })
            .collect()
    }
}
