//! Thread affinity checks for state that belongs to the UI thread.
//!
//! Host list widgets are not thread-safe, and neither is the section state
//! that mirrors them. A [`ThreadAffinity`] records the thread a state manager
//! was created on; every mutating manager call verifies it before touching
//! state or the widget.
//!
//! How strictly a violation is handled is chosen with [`ThreadCheckMode`]:
//!
//! - **Panic**: always reject calls made from another thread.
//! - **DebugOnly**: reject in debug builds, skip the check in release builds.
//! - **Off**: never check.
//!
//! # Example
//!
//! ```
//! use trellis_core::thread_check::{ThreadAffinity, ThreadCheckMode};
//!
//! let affinity = ThreadAffinity::current();
//! affinity.check(ThreadCheckMode::Panic, "add_cell_generator");
//! assert!(affinity.is_same_thread());
//! ```

use std::thread::ThreadId;

use serde::{Deserialize, Serialize};

/// How a manager reacts to calls made off its owning thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadCheckMode {
    /// Always verify; panic on violation.
    Panic,
    /// Verify in debug builds only.
    #[default]
    DebugOnly,
    /// Never verify.
    Off,
}

impl ThreadCheckMode {
    /// Returns `true` if this mode performs a check in the current build.
    #[inline]
    pub fn is_active(self) -> bool {
        match self {
            Self::Panic => true,
            Self::DebugOnly => cfg!(debug_assertions),
            Self::Off => false,
        }
    }
}

/// Thread affinity tracker for UI-owned state.
///
/// Records the thread on which the owner was created and verifies that later
/// operations happen on the same thread.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create an affinity bound to the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Verify the current thread according to `mode`.
    ///
    /// `operation` names the rejected call in the panic message.
    ///
    /// # Panics
    ///
    /// Panics if the mode is active and the caller is on another thread.
    #[inline]
    pub fn check(&self, mode: ThreadCheckMode, operation: &str) {
        if mode.is_active() && !self.is_same_thread() {
            self.panic_wrong_thread(operation);
        }
    }

    /// Assert that we are on the same thread as the affinity, in every build.
    ///
    /// # Panics
    ///
    /// Panics if called from a different thread.
    #[inline]
    pub fn assert_same_thread(&self) {
        self.check(ThreadCheckMode::Panic, "state accessed from wrong thread");
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, operation: &str) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");
        let current_id = current.id();
        tracing::error!(
            target: crate::logging::targets::CORE,
            operation,
            owner = ?self.thread_id,
            current = ?current_id,
            "thread affinity violation"
        );

        panic!(
            "\n\
            ══════════════════════════════════════════════════════════════════════\n\
            THREAD AFFINITY VIOLATION\n\
            ══════════════════════════════════════════════════════════════════════\n\
            \n\
            `{operation}` was called off the UI thread.\n\
            \n\
            Manager was created on thread: {:?}\n\
            Current thread: \"{current_name}\" (ID: {current_id:?})\n\
            \n\
            Section state and the host widget must only be mutated from the\n\
            thread that owns the widget. Post the mutation to the UI thread's\n\
            event loop instead of calling the manager directly.\n\
            \n\
            ══════════════════════════════════════════════════════════════════════",
            self.thread_id
        )
    }
}
