use chrono::{DateTime, Utc};

/// Truncate a string to a maximum number of characters, adding an ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 1 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 1).collect();
        format!("{}…", truncated.trim_end())
    }
}

/// Compact view counts: 950, 1.2K, 3.4M
pub fn format_count(count: u64) -> String {
    match count {
        0..=999 => count.to_string(),
        1_000..=999_999 => compact(count as f64 / 1_000.0, "K"),
        _ => compact(count as f64 / 1_000_000.0, "M"),
    }
}

fn compact(value: f64, suffix: &str) -> String {
    // One decimal, dropped when it would be ".0"
    let rounded = (value * 10.0).floor() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}{}", rounded as u64, suffix)
    } else {
        format!("{:.1}{}", rounded, suffix)
    }
}

/// Relative publish time in Arabic, falling back to the date after a week
pub fn format_relative(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - published).num_minutes();
    if minutes < 1 {
        "الآن".to_string()
    } else if minutes < 60 {
        format!("منذ {} دقيقة", minutes)
    } else if minutes < 1440 {
        format!("منذ {} ساعة", minutes / 60)
    } else if minutes < 7 * 1440 {
        format!("منذ {} يوم", minutes / 1440)
    } else {
        published.format("%Y-%m-%d").to_string()
    }
}
