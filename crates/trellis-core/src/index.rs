//! Index paths for addressing items in sectioned widgets.
//!
//! An `IndexPath` names one item as a `(section, row)` pair. It is the unit
//! of every positional update the state manager sends to a host widget and
//! of every lifecycle callback the host sends back.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of an item inside a sectioned list or grid.
///
/// Index paths order by section first, then by row, which is the order in
/// which a host widget lays items out.
///
/// # Index Validity
///
/// Like any positional handle, an index path is only meaningful against the
/// state it was computed from. After an insertion or removal, paths obtained
/// earlier may point at a different generator or past the end of a section.
///
/// # Example
///
/// ```
/// use trellis_core::IndexPath;
///
/// let first = IndexPath::new(0, 0);
/// let next = first.offset_rows(2);
///
/// assert_eq!(next, IndexPath::new(0, 2));
/// assert_eq!(next.to_string(), "[0, 2]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct IndexPath {
    section: usize,
    row: usize,
}

impl IndexPath {
    /// Creates an index path for `row` inside `section`.
    #[inline]
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }

    /// Returns the section component.
    #[inline]
    pub const fn section(&self) -> usize {
        self.section
    }

    /// Returns the row (item) component.
    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Returns a path in the same section, `delta` rows further down.
    #[inline]
    pub const fn offset_rows(&self, delta: usize) -> Self {
        Self {
            section: self.section,
            row: self.row + delta,
        }
    }

    /// Returns a path at `row` in the same section.
    #[inline]
    pub const fn with_row(&self, row: usize) -> Self {
        Self {
            section: self.section,
            row,
        }
    }

    /// Builds the contiguous run of paths `start ..= start + count - 1`.
    ///
    /// Returns an empty vector for `count == 0`.
    pub fn run(start: IndexPath, count: usize) -> Vec<IndexPath> {
        (0..count).map(|offset| start.offset_rows(offset)).collect()
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((section, row): (usize, usize)) -> Self {
        Self::new(section, row)
    }
}
