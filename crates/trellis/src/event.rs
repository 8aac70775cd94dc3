//! Events the host widget reports, as seen by plugins.
//!
//! The bridges translate host callbacks into these values and hand them to
//! every registered plugin of the matching event type, in registration order.

use trellis_core::{IndexPath, Point};

use crate::widget::ElementKind;

/// Interaction and display events for rows and supplementary views.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionEvent {
    DidSelect(IndexPath),
    DidDeselect(IndexPath),
    WillDisplayCell(IndexPath),
    DidEndDisplayCell(IndexPath),
    WillDisplaySupplementary { kind: ElementKind, section: usize },
    DidEndDisplaySupplementary { kind: ElementKind, section: usize },
    /// A drag session started on the row.
    DragBegan(IndexPath),
    DragEnded,
    DidDrop { destination: IndexPath },
}

impl CollectionEvent {
    /// The row the event concerns, if it concerns one.
    pub fn index_path(&self) -> Option<IndexPath> {
        match self {
            Self::DidSelect(path)
            | Self::DidDeselect(path)
            | Self::WillDisplayCell(path)
            | Self::DidEndDisplayCell(path)
            | Self::DragBegan(path) => Some(*path),
            Self::DidDrop { destination } => Some(*destination),
            _ => None,
        }
    }
}

/// Scroll-view callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollEvent {
    DidScroll { offset: Point },
    WillBeginDragging { offset: Point },
    WillEndDragging { velocity: Point, target_offset: Point },
    DidEndDragging { will_decelerate: bool },
    DidEndDecelerating { offset: Point },
    DidEndScrollingAnimation,
    DidScrollToTop,
}

/// Prefetch requests for rows expected to appear soon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefetchEvent {
    Prefetch(Vec<IndexPath>),
    CancelPrefetching(Vec<IndexPath>),
}

impl PrefetchEvent {
    /// The rows the request covers.
    pub fn index_paths(&self) -> &[IndexPath] {
        match self {
            Self::Prefetch(paths) | Self::CancelPrefetching(paths) => paths,
        }
    }
}
