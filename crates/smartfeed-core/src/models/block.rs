use std::fmt;
use std::str::FromStr;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// Part of the day the daily content block is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum TimeSlot {
    Morning,
    Noon,
    Evening,
    Night,
}

impl TimeSlot {
    /// Slot for a local hour: 05-11 morning, 12-16 noon, 17-20 evening, 21-04 night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeSlot::Morning,
            12..=16 => TimeSlot::Noon,
            17..=20 => TimeSlot::Evening,
            _ => TimeSlot::Night,
        }
    }

    pub fn current() -> Self {
        Self::from_hour(chrono::Local::now().hour())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Noon => "noon",
            TimeSlot::Evening => "evening",
            TimeSlot::Night => "night",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "صباح الخير",
            TimeSlot::Noon => "منتصف النهار",
            TimeSlot::Evening => "مساء الخير",
            TimeSlot::Night => "قبل النوم",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(TimeSlot::Morning),
            "noon" | "afternoon" => Ok(TimeSlot::Noon),
            "evening" => Ok(TimeSlot::Evening),
            "night" => Ok(TimeSlot::Night),
            other => Err(format!("unknown time slot: {}", other)),
        }
    }
}

/// A homepage block backed by the refresh pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Daily picks, varied by time slot
    DailyContent(TimeSlot),
    /// Most-read digest
    Digest,
}

impl BlockKind {
    /// API path relative to the configured base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            BlockKind::DailyContent(_) => "/api/smart-content",
            BlockKind::Digest => "/api/smart-digest",
        }
    }

    /// Query parameters beyond the item limit
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            BlockKind::DailyContent(slot) => vec![("slot", slot.as_str().to_string())],
            BlockKind::Digest => Vec::new(),
        }
    }

    /// Storage key. Each slot gets its own entry so switching slots never
    /// shows another slot's picks.
    pub fn cache_key(&self) -> String {
        match self {
            BlockKind::DailyContent(slot) => format!("smart_content_{}", slot),
            BlockKind::Digest => "smart_digest".to_string(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            BlockKind::DailyContent(slot) => format!("{} - مختارات اليوم", slot.label()),
            BlockKind::Digest => "الأكثر قراءة".to_string(),
        }
    }
}
