//! HTTP side of the refresh pipeline.
//!
//! `FeedClient` performs a single, time-boxed GET against the portal's JSON
//! endpoints. Responses go through the typed schema in [`schema`] and come out
//! as canonical `ContentItem`s; nothing downstream sees raw payload shapes.

pub mod client;
pub mod error;
pub mod schema;
pub mod source;

pub use client::FeedClient;
pub use error::FetchError;
pub use schema::FeedResponse;
pub use source::ContentSource;
