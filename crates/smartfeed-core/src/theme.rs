//! Display theme shared by everything that renders a block.
//!
//! There is one `ThemeStore` per process, created from config and handed to
//! whoever needs it. Readers either poll `get` or hold a `ThemeSubscription`;
//! dropping the subscription is the unsubscribe.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    /// Resolve to dark/light, deferring to the environment for `System`.
    pub fn is_dark(&self, system_prefers_dark: bool) -> bool {
        match self {
            ThemeMode::Light => false,
            ThemeMode::Dark => true,
            ThemeMode::System => system_prefers_dark,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        };
        f.write_str(name)
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" | "auto" => Ok(ThemeMode::System),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// Observable holder for the current theme.
#[derive(Debug)]
pub struct ThemeStore {
    tx: watch::Sender<ThemeMode>,
}

impl ThemeStore {
    pub fn new(initial: ThemeMode) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> ThemeMode {
        *self.tx.borrow()
    }

    /// Change the theme. Subscribers are only woken when the value actually changes.
    pub fn set(&self, mode: ThemeMode) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == mode {
                false
            } else {
                *current = mode;
                true
            }
        });
        if changed {
            debug!(theme = %mode, "Theme changed");
        }
        changed
    }

    pub fn subscribe(&self) -> ThemeSubscription {
        ThemeSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}

pub struct ThemeSubscription {
    rx: watch::Receiver<ThemeMode>,
}

impl ThemeSubscription {
    pub fn current(&self) -> ThemeMode {
        *self.rx.borrow()
    }

    /// Wait for the next change. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<ThemeMode> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!("auto".parse::<ThemeMode>(), Ok(ThemeMode::System));
        assert!("sepia".parse::<ThemeMode>().is_err());
        assert_eq!(ThemeMode::Light.to_string(), "light");
    }

    #[test]
    fn test_is_dark() {
        assert!(ThemeMode::Dark.is_dark(false));
        assert!(!ThemeMode::Light.is_dark(true));
        assert!(ThemeMode::System.is_dark(true));
    }

    #[test]
    fn test_set_without_subscribers() {
        let store = ThemeStore::new(ThemeMode::Light);
        assert!(store.set(ThemeMode::Dark));
        assert_eq!(store.get(), ThemeMode::Dark);
        assert!(!store.set(ThemeMode::Dark));
    }

    #[tokio::test]
    async fn test_subscriber_sees_change() {
        let store = ThemeStore::new(ThemeMode::Light);
        let mut sub = store.subscribe();
        assert_eq!(sub.current(), ThemeMode::Light);

        store.set(ThemeMode::Dark);
        assert_eq!(sub.changed().await, Some(ThemeMode::Dark));
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let store = ThemeStore::default();
        let sub = store.subscribe();
        assert_eq!(store.subscriber_count(), 1);
        drop(sub);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_changed_ends_when_store_dropped() {
        let store = ThemeStore::default();
        let mut sub = store.subscribe();
        drop(store);
        assert_eq!(sub.changed().await, None);
    }
}
