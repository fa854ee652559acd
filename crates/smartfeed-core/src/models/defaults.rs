use chrono::{DateTime, Duration, Utc};

use super::{CategoryRef, ContentItem};

/// Number of items in the built-in fallback set.
pub const DEFAULT_ITEM_COUNT: usize = 3;

/// Fallback content shown when the network fails and nothing was ever cached.
/// Timestamps are anchored to `now` so relative times read naturally.
pub fn default_items(now: DateTime<Utc>) -> Vec<ContentItem> {
    let entries: [(&str, &str, &str, &str); DEFAULT_ITEM_COUNT] = [
        ("default-1", "أبرز عناوين اليوم", "news", "أخبار"),
        ("default-2", "قراءات في الشأن الاقتصادي", "economy", "اقتصاد"),
        ("default-3", "مقالات الرأي المختارة", "opinion", "رأي"),
    ];

    entries
        .iter()
        .enumerate()
        .map(|(i, (id, title, slug, category))| ContentItem {
            id: id.to_string(),
            title: title.to_string(),
            image_url: None,
            published_at: now - Duration::hours(i as i64),
            view_count: 0,
            category: Some(CategoryRef {
                id: slug.to_string(),
                name: category.to_string(),
                slug: Some(slug.to_string()),
            }),
        })
        .collect()
}
