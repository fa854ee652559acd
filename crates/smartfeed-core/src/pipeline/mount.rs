use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Liveness of whatever is displaying a block.
///
/// Clones share the flag. Once `unmount` is called, a pipeline run still
/// waiting on the network will not publish anything further.
#[derive(Debug, Clone)]
pub struct Mount {
    mounted: Arc<AtomicBool>,
}

impl Mount {
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }
}

impl Default for Mount {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let mount = Mount::new();
        let other = mount.clone();
        assert!(other.is_mounted());
        mount.unmount();
        assert!(!other.is_mounted());
    }
}
