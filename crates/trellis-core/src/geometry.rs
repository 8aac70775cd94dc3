//! Geometry values exchanged with host widgets.

use serde::{Deserialize, Serialize};

/// A width/height pair in host points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// The empty size, reported for items that cannot size themselves.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns a copy with `height` replaced.
    #[inline]
    pub const fn with_height(self, height: f32) -> Self {
        Self { height, ..self }
    }

    /// Returns a copy with `width` replaced.
    #[inline]
    pub const fn with_width(self, width: f32) -> Self {
        Self { width, ..self }
    }

    /// Returns `true` if either dimension is zero or negative.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A position in host points, used for scroll offsets and velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
