use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category an item was filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A single article card.
///
/// Only built by the response normalizer or the default dataset, so every
/// instance has a non-empty id and title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
    #[serde(rename = "viewCount", default)]
    pub view_count: u64,
    #[serde(rename = "categoryRef", default)]
    pub category: Option<CategoryRef>,
}

impl ContentItem {
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    /// Portal-relative link to the article page
    pub fn path(&self) -> String {
        format!("/articles/{}", self.id)
    }
}
