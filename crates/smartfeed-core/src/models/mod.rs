//! Data models for homepage content.
//!
//! - `ContentItem`, `CategoryRef`: canonical article cards shown in a block
//! - `BlockKind`, `TimeSlot`: which block is being refreshed and for which part of the day
//! - `default_items`: the built-in fallback set rendered when nothing else is available

pub mod block;
pub mod content;
pub mod defaults;

pub use block::{BlockKind, TimeSlot};
pub use content::{CategoryRef, ContentItem};
pub use defaults::{default_items, DEFAULT_ITEM_COUNT};
