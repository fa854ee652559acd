//! Utility functions for display formatting.

pub mod format;

pub use format::{format_count, format_relative, truncate_string};
