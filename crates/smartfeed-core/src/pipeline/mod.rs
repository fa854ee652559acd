//! The refresh pipeline behind each homepage block.
//!
//! A run reads the cache, optionally shows it, makes at most one bounded
//! fetch and always ends on something displayable: fresh items, the last
//! cached items, or the built-in defaults. Progress is published as
//! [`RenderFrame`]s so a front end can go from skeleton to content.

pub mod mount;
pub mod runner;
pub mod state;
pub mod view;

pub use mount::Mount;
pub use runner::{BlockPipeline, PipelineSettings};
pub use state::{PipelineState, RenderFrame};
pub use view::{BlockView, ItemView, ViewSource};
