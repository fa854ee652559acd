//! Local caching for offline and instant display.
//!
//! `CacheStore` keeps one JSON file per block key. Reads never fail (a broken
//! or missing file is simply absent) and writes are best effort. Whether an
//! entry may be shown without refreshing is decided by [`freshness`].

pub mod freshness;
pub mod manager;

pub use freshness::{is_fresh, Freshness, FreshnessPolicy};
pub use manager::{CacheEntry, CacheError, CacheStore};
