use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{BlockKind, ContentItem};
use crate::utils::{format_count, format_relative, truncate_string};

/// Card titles longer than this are cut with an ellipsis.
const MAX_TITLE_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum ViewSource {
    /// Skeleton while nothing is known yet
    Placeholder,
    Cache,
    Network,
    Default,
}

/// A single card, ready to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ItemView {
    pub id: String,
    pub title: String,
    pub path: String,
    pub image_url: Option<String>,
    pub published: String,
    pub views: String,
    pub category: Option<String>,
}

impl ItemView {
    pub fn from_item(item: &ContentItem, now: DateTime<Utc>) -> Self {
        Self {
            id: item.id.clone(),
            title: truncate_string(&item.title, MAX_TITLE_CHARS),
            path: item.path(),
            image_url: item.image_url.clone(),
            published: format_relative(item.published_at, now),
            views: format_count(item.view_count),
            category: item.category_name().map(str::to_string),
        }
    }
}

/// Display model for a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct BlockView {
    pub title: String,
    pub source: ViewSource,
    pub loading: bool,
    pub cache_age: Option<String>,
    pub items: Vec<ItemView>,
}

impl BlockView {
    pub fn skeleton(block: BlockKind) -> Self {
        Self {
            title: block.title(),
            source: ViewSource::Placeholder,
            loading: true,
            cache_age: None,
            items: Vec::new(),
        }
    }

    pub fn build(
        block: BlockKind,
        items: &[ContentItem],
        source: ViewSource,
        cache_age: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            title: block.title(),
            source,
            loading: false,
            cache_age,
            items: items.iter().map(|item| ItemView::from_item(item, now)).collect(),
        }
    }

    /// Same content, with the loading indicator on
    pub fn loading(mut self) -> Self {
        self.loading = true;
        self
    }
}
