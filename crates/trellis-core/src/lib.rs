//! Core types for Trellis.
//!
//! This crate provides the leaf building blocks shared by the Trellis adapter
//! layer:
//!
//! - **Index paths**: `(section, row)` coordinates used by every positional update
//! - **Geometry**: the `Size` and `Point` values exchanged with host widgets
//! - **Signals**: a small observer primitive used for per-generator callbacks
//! - **Thread affinity**: checks that state is only touched from the UI thread
//! - **Errors**: the error types returned by the state manager
//! - **Logging**: `tracing` targets used across the workspace
//!
//! # Signal Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let did_select = Signal::<()>::new();
//! let id = did_select.connect(|_| println!("row tapped"));
//!
//! did_select.emit(());
//! did_select.disconnect(id);
//! ```
//!
//! # Index Path Example
//!
//! ```
//! use trellis_core::IndexPath;
//!
//! let path = IndexPath::new(1, 3);
//! assert_eq!(path.section(), 1);
//! assert_eq!(path.row(), 3);
//! assert!(IndexPath::new(0, 9) < path);
//! ```

pub mod error;
mod geometry;
mod index;
pub mod logging;
pub mod signal;
pub mod thread_check;

pub use error::{ManagerError, Result};
pub use geometry::{Point, Size};
pub use index::IndexPath;
pub use signal::{ConnectionId, Signal};
pub use thread_check::{ThreadAffinity, ThreadCheckMode};
