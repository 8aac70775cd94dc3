//! Bridges between host widget callbacks and the manager.
//!
//! A host widget asks two kinds of questions: data questions (how many rows,
//! which view goes here) and interaction callbacks (a row was selected, the
//! content scrolled). [`CollectionDataSource`] answers the first kind and
//! [`CollectionDelegate`] handles the second.
//!
//! Neither bridge stores the manager. Each entry point takes it as an
//! argument, which keeps ownership in one place and lets the delegate hand a
//! mutable borrow to drag-and-drop handlers.
//!
//! ```text
//!   host widget ──callbacks──> CollectionDelegate ──events──> plugins
//!        │                           │
//!        └──queries──> CollectionDataSource ──> StateManager ──> generators
//! ```

mod data_source;
mod delegate;

pub use data_source::CollectionDataSource;
pub use delegate::CollectionDelegate;
