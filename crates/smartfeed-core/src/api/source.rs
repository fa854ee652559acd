use std::time::Duration;

use async_trait::async_trait;

use super::FetchError;
use crate::models::{BlockKind, ContentItem};

/// Where a block's items come from. The pipeline only knows this trait, so
/// tests can script outcomes without a server.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// One attempt, bounded by `timeout`. Never retried.
    async fn fetch_block(
        &self,
        block: BlockKind,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<ContentItem>, FetchError>;
}
