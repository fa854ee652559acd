//! smartfeed core library.
//!
//! The refresh pipeline behind the portal's "smart" homepage blocks: a
//! bounded fetch against the content API, a local cache for instant and
//! offline display, and a fallback chain that always ends on something
//! worth showing.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod theme;
pub mod utils;

pub use api::{ContentSource, FeedClient, FetchError};
pub use cache::{CacheEntry, CacheStore, FreshnessPolicy};
pub use config::Config;
pub use models::{BlockKind, ContentItem, TimeSlot};
pub use pipeline::{BlockPipeline, Mount, PipelineSettings, PipelineState, RenderFrame};
pub use theme::{ThemeMode, ThemeStore};
