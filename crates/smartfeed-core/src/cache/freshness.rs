use std::time::Duration;

use super::CacheEntry;

/// Whether a cached entry may still be used at `now_ms`.
///
/// Exactly `now - timestamp < ttl`, with the subtraction saturating so
/// extreme timestamps can't overflow. An absent entry is never fresh.
pub fn is_fresh(entry: Option<&CacheEntry>, now_ms: i64, ttl_ms: i64) -> bool {
    match entry {
        Some(entry) => entry.age_ms(now_ms) < ttl_ms,
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Nothing cached
    Missing,
    /// Cached but older than the TTL
    Stale,
    /// Within the TTL; show it, then revalidate
    Fresh,
    /// So recent that a network call would be wasted
    SkipRefetch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub ttl: Duration,
    pub skip_refetch: Duration,
}

impl FreshnessPolicy {
    pub fn new(ttl: Duration, skip_refetch: Duration) -> Self {
        Self { ttl, skip_refetch }
    }

    pub fn classify(&self, entry: Option<&CacheEntry>, now_ms: i64) -> Freshness {
        let Some(cached) = entry else {
            return Freshness::Missing;
        };
        if !is_fresh(entry, now_ms, duration_ms(self.ttl)) {
            return Freshness::Stale;
        }
        if cached.age_ms(now_ms) < duration_ms(self.skip_refetch) {
            Freshness::SkipRefetch
        } else {
            Freshness::Fresh
        }
    }
}

fn duration_ms(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(timestamp: i64) -> CacheEntry {
        CacheEntry::at(timestamp, Vec::new())
    }

    #[test]
    fn test_is_fresh_matches_definition() {
        let ttl = 30_000;
        for (now, ts) in [(100_000, 100_000), (100_000, 70_001), (100_000, 70_000), (100_000, 0), (0, 5_000)] {
            let e = entry_at(ts);
            assert_eq!(is_fresh(Some(&e), now, ttl), now - ts < ttl, "now={} ts={}", now, ts);
        }
    }

    #[test]
    fn test_is_fresh_boundary_is_exclusive() {
        let e = entry_at(0);
        assert!(is_fresh(Some(&e), 29_999, 30_000));
        assert!(!is_fresh(Some(&e), 30_000, 30_000));
    }

    #[test]
    fn test_absent_is_not_fresh() {
        assert!(!is_fresh(None, 0, i64::MAX));
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let oldest = entry_at(i64::MIN);
        assert!(!is_fresh(Some(&oldest), 1_000_000, 30_000));
        assert!(!is_fresh(Some(&oldest), i64::MAX, i64::MAX));

        let policy = FreshnessPolicy::new(Duration::from_secs(300), Duration::from_secs(30));
        assert_eq!(policy.classify(Some(&oldest), 1_000_000), Freshness::Stale);
    }

    #[test]
    fn test_classify() {
        let policy = FreshnessPolicy::new(Duration::from_secs(300), Duration::from_secs(30));
        let now = 1_000_000;
        assert_eq!(policy.classify(None, now), Freshness::Missing);
        assert_eq!(policy.classify(Some(&entry_at(now - 10_000)), now), Freshness::SkipRefetch);
        assert_eq!(policy.classify(Some(&entry_at(now - 60_000)), now), Freshness::Fresh);
        assert_eq!(policy.classify(Some(&entry_at(now - 300_000)), now), Freshness::Stale);
    }

    #[test]
    fn test_classify_skip_threshold_equal_to_ttl() {
        let policy = FreshnessPolicy::new(Duration::from_secs(30), Duration::from_secs(30));
        let now = 1_000_000;
        assert_eq!(policy.classify(Some(&entry_at(now - 10_000)), now), Freshness::SkipRefetch);
        assert_eq!(policy.classify(Some(&entry_at(now - 30_000)), now), Freshness::Stale);
    }
}
