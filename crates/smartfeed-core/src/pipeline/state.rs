use std::fmt;

use crate::models::ContentItem;

use super::BlockView;

/// Where a pipeline run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Initializing,
    ShowingCache,
    Fetching,
    ShowingFetched,
    ShowingCacheOnFailure,
    ShowingDefaultOnFailure,
}

impl PipelineState {
    /// A run stops in one of these; `ShowingCache` counts when the refetch was skipped.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::ShowingCache
                | PipelineState::ShowingFetched
                | PipelineState::ShowingCacheOnFailure
                | PipelineState::ShowingDefaultOnFailure
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            PipelineState::ShowingCacheOnFailure | PipelineState::ShowingDefaultOnFailure
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Initializing => "initializing",
            PipelineState::ShowingCache => "cache",
            PipelineState::Fetching => "fetching",
            PipelineState::ShowingFetched => "fetched",
            PipelineState::ShowingCacheOnFailure => "cache (offline)",
            PipelineState::ShowingDefaultOnFailure => "default (offline)",
        };
        f.write_str(name)
    }
}

/// One published step of a run: the state plus what should be on screen.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub state: PipelineState,
    pub payload: Vec<ContentItem>,
    pub view: BlockView,
}
