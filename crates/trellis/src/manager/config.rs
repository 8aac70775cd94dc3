//! State manager configuration.

use serde::{Deserialize, Serialize};
use trellis_core::ThreadCheckMode;

/// Configuration for a [`StateManager`](super::StateManager).
///
/// Deserializable so hosts can keep it alongside their other settings;
/// missing fields take their defaults.
///
/// # Example
///
/// ```
/// use trellis::ManagerConfig;
/// use trellis_core::ThreadCheckMode;
///
/// let config = ManagerConfig::default()
///     .with_animate_updates(false)
///     .with_thread_checks(ThreadCheckMode::Panic);
/// assert!(config.resync_on_divergence);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Wrap removals in the widget's batch-update transaction.
    pub animate_updates: bool,
    /// Animate programmatic scrolls.
    pub scroll_animated: bool,
    /// How calls from other threads are handled.
    pub thread_checks: ThreadCheckMode,
    /// Fall back to a full reload when the widget's counts no longer match
    /// state before an incremental insert or reload. When `false`, the widget
    /// is left alone until the next `force_refill`.
    pub resync_on_divergence: bool,
    /// Clear the selection highlight right after a selection, for
    /// generators that ask for it.
    pub deselect_after_selection: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            animate_updates: true,
            scroll_animated: true,
            thread_checks: ThreadCheckMode::default(),
            resync_on_divergence: true,
            deselect_after_selection: true,
        }
    }
}

impl ManagerConfig {
    /// Set whether removals run inside a batch-update transaction.
    pub fn with_animate_updates(mut self, animate: bool) -> Self {
        self.animate_updates = animate;
        self
    }

    /// Set whether programmatic scrolls are animated.
    pub fn with_scroll_animated(mut self, animated: bool) -> Self {
        self.scroll_animated = animated;
        self
    }

    /// Set the thread check mode.
    pub fn with_thread_checks(mut self, mode: ThreadCheckMode) -> Self {
        self.thread_checks = mode;
        self
    }

    /// Set whether divergence falls back to a full reload.
    pub fn with_resync_on_divergence(mut self, resync: bool) -> Self {
        self.resync_on_divergence = resync;
        self
    }

    /// Set whether selections are cleared right after they happen.
    pub fn with_deselect_after_selection(mut self, deselect: bool) -> Self {
        self.deselect_after_selection = deselect;
        self
    }
}
