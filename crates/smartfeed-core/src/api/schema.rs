//! Wire types for the portal's content endpoints and their normalization.
//!
//! The endpoints are not consistent about key names: lists arrive under
//! `articles` or `data`, images as `imageUrl`, `featuredImage` or `image`,
//! and so on. Every variant is captured here as its own optional field and
//! collapsed once, in [`FeedResponse::into_items`].

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::{CategoryRef, ContentItem};

#[derive(Debug, Default, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub articles: Option<Vec<RawItem>>,
    #[serde(default)]
    pub data: Option<Vec<RawItem>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "featuredImage", default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "viewCount", default)]
    pub view_count: Option<Value>,
    #[serde(default)]
    pub views: Option<Value>,
    #[serde(default)]
    pub category: Option<RawCategory>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCategory {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl FeedResponse {
    /// First non-empty list wins, `articles` before `data`.
    fn raw_items(self) -> Vec<RawItem> {
        match (self.articles, self.data) {
            (Some(articles), _) if !articles.is_empty() => articles,
            (_, Some(data)) => data,
            _ => Vec::new(),
        }
    }

    /// Normalize into canonical items, dropping entries that can't be shown.
    pub fn into_items(self) -> Vec<ContentItem> {
        let raw = self.raw_items();
        let total = raw.len();
        let items: Vec<ContentItem> = raw.into_iter().filter_map(RawItem::into_item).collect();
        if items.len() < total {
            debug!(total, kept = items.len(), "Dropped malformed items from response");
        }
        items
    }
}

impl RawItem {
    pub fn into_item(self) -> Option<ContentItem> {
        let id = self.id.as_ref().and_then(id_string)?;
        let title = self.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;

        let published_raw = self.published_at.or(self.created_at)?;
        let published_at = match parse_timestamp(&published_raw) {
            Some(ts) => ts,
            None => {
                debug!(id = %id, value = %published_raw, "Unparseable publish date");
                return None;
            }
        };

        // Blank aliases are skipped, not taken as the answer
        let image_url = [self.image_url, self.featured_image, self.image]
            .into_iter()
            .flatten()
            .find(|u| !u.trim().is_empty());

        let view_count = self
            .view_count
            .as_ref()
            .or(self.views.as_ref())
            .map(count_value)
            .unwrap_or(0);

        let category = self.category.and_then(RawCategory::into_ref);

        Some(ContentItem {
            id,
            title,
            image_url,
            published_at,
            view_count,
            category,
        })
    }
}

impl RawCategory {
    fn into_ref(self) -> Option<CategoryRef> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        let id = self
            .id
            .as_ref()
            .and_then(id_string)
            .or_else(|| self.slug.clone())
            .unwrap_or_else(|| name.clone());
        Some(CategoryRef {
            id,
            name,
            slug: self.slug,
        })
    }
}

/// Ids come through as strings or numbers
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Counts are clamped at zero; strings and floats are tolerated.
fn count_value(value: &Value) -> u64 {
    let n = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    };
    n.max(0) as u64
}

/// RFC 3339, with a fallback for naive `YYYY-MM-DD HH:MM:SS` values (taken as UTC)
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<ContentItem> {
        serde_json::from_str::<FeedResponse>(json).unwrap().into_items()
    }

    #[test]
    fn test_articles_key() {
        let items = parse(r#"{"articles":[{"id":"1","title":"A","publishedAt":"2024-05-01T10:00:00Z"}]}"#);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "1");
        assert_eq!(items[0].title, "A");
        assert_eq!(items[0].view_count, 0);
    }

    #[test]
    fn test_data_key_when_articles_empty() {
        let items = parse(
            r#"{"articles":[],"data":[{"id":7,"title":"B","createdAt":"2024-05-01 10:00:00","views":"12"}]}"#,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "7");
        assert_eq!(items[0].view_count, 12);
    }

    #[test]
    fn test_articles_preferred_over_data() {
        let items = parse(
            r#"{"articles":[{"id":"a","title":"First","publishedAt":"2024-05-01T10:00:00Z"}],
                "data":[{"id":"d","title":"Second","publishedAt":"2024-05-01T10:00:00Z"}]}"#,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "a");
    }

    #[test]
    fn test_neither_key_is_empty() {
        assert!(parse(r#"{"success":true}"#).is_empty());
    }

    #[test]
    fn test_drops_items_without_title_or_date() {
        let items = parse(
            r#"{"articles":[
                {"id":"1","title":"  ","publishedAt":"2024-05-01T10:00:00Z"},
                {"id":"2","title":"ok"},
                {"id":"3","title":"bad date","publishedAt":"yesterday"},
                {"title":"no id","publishedAt":"2024-05-01T10:00:00Z"},
                {"id":"5","title":"kept","publishedAt":"2024-05-01T10:00:00+03:00"}
            ]}"#,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "5");
        assert_eq!(items[0].published_at.to_rfc3339(), "2024-05-01T07:00:00+00:00");
    }

    #[test]
    fn test_image_and_count_fallbacks() {
        let items = parse(
            r#"{"articles":[{"id":"1","title":"A","publishedAt":"2024-05-01T10:00:00Z",
                "imageUrl":"","featuredImage":"/img/a.jpg","viewCount":-4}]}"#,
        );
        assert_eq!(items[0].image_url.as_deref(), Some("/img/a.jpg"));
        assert_eq!(items[0].view_count, 0);
    }

    #[test]
    fn test_blank_image_aliases_fall_through() {
        let items = parse(
            r#"{"articles":[
                {"id":"1","title":"A","publishedAt":"2024-05-01T10:00:00Z",
                 "imageUrl":"  ","featuredImage":"","image":"/img/last.jpg"},
                {"id":"2","title":"B","publishedAt":"2024-05-01T10:00:00Z",
                 "imageUrl":"/img/first.jpg","image":"/img/other.jpg"},
                {"id":"3","title":"C","publishedAt":"2024-05-01T10:00:00Z","imageUrl":""}
            ]}"#,
        );
        assert_eq!(items[0].image_url.as_deref(), Some("/img/last.jpg"));
        assert_eq!(items[1].image_url.as_deref(), Some("/img/first.jpg"));
        assert!(items[2].image_url.is_none());
    }

    #[test]
    fn test_category_normalization() {
        let items = parse(
            r#"{"articles":[{"id":"1","title":"A","publishedAt":"2024-05-01T10:00:00Z",
                "category":{"id":3,"name":"رياضة","slug":"sports"}},
                {"id":"2","title":"B","publishedAt":"2024-05-01T10:00:00Z",
                "category":{"slug":"orphan"}}]}"#,
        );
        let cat = items[0].category.as_ref().unwrap();
        assert_eq!(cat.id, "3");
        assert_eq!(cat.name, "رياضة");
        assert!(items[1].category.is_none());
    }

    #[test]
    fn test_malformed_shape_is_rejected() {
        assert!(serde_json::from_str::<FeedResponse>(r#"{"articles":{"id":"1"}}"#).is_err());
    }
}
