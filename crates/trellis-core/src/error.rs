//! Error types for Trellis.

use thiserror::Error;

use crate::index::IndexPath;

/// Errors returned by state manager operations.
///
/// Only recoverable conditions are represented here. Calling an operation
/// with an anchor that is not in the manager is a programming error and
/// panics instead; stale generators passed to `update`/`remove` are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    /// The generator is not tracked by the manager.
    #[error("generator is not present in the manager")]
    GeneratorNotFound,
    /// The section index does not exist.
    #[error("section {section} is out of bounds ({count} sections)")]
    SectionOutOfBounds { section: usize, count: usize },
    /// The index path does not address an existing item.
    #[error("index path {path} is out of bounds")]
    IndexOutOfBounds { path: IndexPath },
    /// The host widget reports a different item count than the manager holds.
    ///
    /// Positional updates against a diverged widget are refused, so the
    /// operation was not applied.
    #[error("widget out of sync in section {section}: manager has {expected} items, widget reports {actual}")]
    OutOfSync {
        section: usize,
        expected: usize,
        actual: usize,
    },
    /// The host widget reports a different section count than the manager holds.
    #[error("widget out of sync: manager has {expected} sections, widget reports {actual}")]
    SectionsOutOfSync { expected: usize, actual: usize },
}

/// A specialized Result type for Trellis operations.
pub type Result<T> = std::result::Result<T, ManagerError>;
