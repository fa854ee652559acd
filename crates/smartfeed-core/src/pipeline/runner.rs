use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{BlockView, Mount, PipelineState, RenderFrame, ViewSource};
use crate::api::{ContentSource, FetchError};
use crate::cache::{CacheEntry, CacheStore, Freshness, FreshnessPolicy};
use crate::config::Config;
use crate::models::{default_items, BlockKind, ContentItem};

/// Slack on top of the fetch timeout before the pipeline gives up on a
/// source that ignores its own budget.
const FETCH_GRACE_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub timeout: Duration,
    pub policy: FreshnessPolicy,
    pub item_limit: usize,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: config.fetch_timeout(),
            policy: FreshnessPolicy::new(config.cache_ttl(), config.skip_refetch()),
            item_limit: config.item_limit,
        }
    }
}

/// Runs the cache / fetch / fallback sequence for blocks.
/// Clone is cheap; the source and store are shared.
#[derive(Clone)]
pub struct BlockPipeline {
    source: Arc<dyn ContentSource>,
    cache: Arc<CacheStore>,
    settings: PipelineSettings,
}

impl BlockPipeline {
    pub fn new(
        source: Arc<dyn ContentSource>,
        cache: Arc<CacheStore>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run the pipeline once for `block`, publishing every step to `frames`.
    ///
    /// Returns the terminal frame, or `None` if `mount` was torn down while the
    /// fetch was in flight. Errors never escape; they select a fallback.
    pub async fn run(
        &self,
        block: BlockKind,
        mount: &Mount,
        frames: &mpsc::Sender<RenderFrame>,
    ) -> Option<RenderFrame> {
        let key = block.cache_key();
        let now = Utc::now();
        let now_ms = now.timestamp_millis();

        Self::publish(
            frames,
            mount,
            RenderFrame {
                state: PipelineState::Initializing,
                payload: Vec::new(),
                view: BlockView::skeleton(block),
            },
        )
        .await;

        let cached = self.cache.get(&key);
        let freshness = self.settings.policy.classify(cached.as_ref(), now_ms);
        debug!(cache = %key, ?freshness, "Cache checked");

        let mut on_screen = BlockView::skeleton(block);
        if let (Freshness::Fresh | Freshness::SkipRefetch, Some(entry)) = (freshness, cached.as_ref()) {
            let frame = Self::cache_frame(block, PipelineState::ShowingCache, entry, now);
            if freshness == Freshness::SkipRefetch {
                debug!(cache = %key, age_ms = entry.age_ms(now_ms), "Cache is recent, skipping refetch");
                Self::publish(frames, mount, frame.clone()).await;
                return Some(frame);
            }
            on_screen = frame.view.clone();
            Self::publish(frames, mount, frame).await;
        }

        Self::publish(
            frames,
            mount,
            RenderFrame {
                state: PipelineState::Fetching,
                payload: Vec::new(),
                view: on_screen.loading(),
            },
        )
        .await;

        let result = self.fetch(block).await;
        let frame = match result {
            Ok(items) => {
                let entry = CacheEntry::new(items);
                self.cache.set(&key, &entry);
                info!(cache = %key, count = entry.payload.len(), "Block refreshed");
                let now = Utc::now();
                RenderFrame {
                    state: PipelineState::ShowingFetched,
                    view: BlockView::build(block, &entry.payload, ViewSource::Network, None, now),
                    payload: entry.payload,
                }
            }
            Err(e) => Self::fallback(block, &key, cached, &e),
        };

        if !mount.is_mounted() {
            debug!(cache = %key, state = %frame.state, "Block unmounted before fetch finished, dropping result");
            return None;
        }
        Self::publish(frames, mount, frame.clone()).await;
        Some(frame)
    }

    /// Single attempt, hard-capped even if the source overruns its timeout.
    /// The item limit is enforced here too, in case the server ignores it.
    async fn fetch(&self, block: BlockKind) -> Result<Vec<ContentItem>, FetchError> {
        let timeout = self.settings.timeout;
        let limit = self.settings.item_limit;
        let cap = timeout + Duration::from_millis(FETCH_GRACE_MS);
        let fetched = tokio::time::timeout(cap, self.source.fetch_block(block, limit, timeout)).await;

        match fetched {
            Ok(Ok(items)) if items.is_empty() => Err(FetchError::EmptyPayload),
            Ok(Ok(mut items)) => {
                items.truncate(limit);
                Ok(items)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(FetchError::Timeout(timeout)),
        }
    }

    fn fallback(
        block: BlockKind,
        key: &str,
        cached: Option<CacheEntry>,
        error: &FetchError,
    ) -> RenderFrame {
        let now = Utc::now();
        match cached {
            Some(entry) => {
                warn!(cache = %key, kind = error.kind(), error = %error, "Fetch failed, showing cached content");
                Self::cache_frame(block, PipelineState::ShowingCacheOnFailure, &entry, now)
            }
            None => {
                warn!(cache = %key, kind = error.kind(), error = %error, "Fetch failed with nothing cached, showing defaults");
                let payload = default_items(now);
                RenderFrame {
                    state: PipelineState::ShowingDefaultOnFailure,
                    view: BlockView::build(block, &payload, ViewSource::Default, None, now),
                    payload,
                }
            }
        }
    }

    fn cache_frame(
        block: BlockKind,
        state: PipelineState,
        entry: &CacheEntry,
        now: DateTime<Utc>,
    ) -> RenderFrame {
        let age = entry.age_display(now.timestamp_millis());
        RenderFrame {
            state,
            payload: entry.payload.clone(),
            view: BlockView::build(block, &entry.payload, ViewSource::Cache, Some(age), now),
        }
    }

    async fn publish(frames: &mpsc::Sender<RenderFrame>, mount: &Mount, frame: RenderFrame) {
        if !mount.is_mounted() {
            return;
        }
        if let Err(e) = frames.send(frame).await {
            debug!(error = %e, "Frame receiver dropped");
        }
    }
}
