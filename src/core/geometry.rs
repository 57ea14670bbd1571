//! Board and surface geometry.
//!
//! `BoardView` reports bounds in normalized board coordinates: origin at
//! the top-left of the board, x to the right, y downward, both in `0..=1`.
//! The render surface uses y upward with the board's bottom-left corner at
//! the origin, so every conversion flips y against the board height.

use serde::{Deserialize, Serialize};

/// Fraction of the shorter window side taken by the board.
pub const BOARD_FILL: f32 = 0.9;

/// A point in surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `other`.
    #[must_use]
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

/// A width/height pair in surface units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn lerp(self, other: Size, t: f32) -> Size {
        Size::new(
            self.width + (other.width - self.width) * t,
            self.height + (other.height - self.height) * t,
        )
    }
}

/// Bounds in normalized board coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Size of the board group on the render surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    pub width: f32,
    pub height: f32,
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self::fit(800, 600)
    }
}

impl SurfaceGeometry {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Largest square board that fits a `width` x `height` window.
    #[must_use]
    pub fn fit(width: u32, height: u32) -> Self {
        let side = width.min(height) as f32 * BOARD_FILL;
        Self::new(side, side)
    }

    /// Scale normalized bounds to surface units.
    #[must_use]
    pub fn scale(&self, rect: Rect) -> Size {
        Size::new(rect.width * self.width, rect.height * self.height)
    }

    /// Surface position of the bounds' top-left corner.
    #[must_use]
    pub fn top_left(&self, rect: Rect) -> Point {
        Point::new(rect.x * self.width, (1.0 - rect.y) * self.height)
    }

    /// Surface position of the bounds' bottom-left corner.
    ///
    /// This is where an actor sized to `rect` must be placed to cover it.
    #[must_use]
    pub fn bottom_left(&self, rect: Rect) -> Point {
        Point::new(
            rect.x * self.width,
            (1.0 - rect.y) * self.height - rect.height * self.height,
        )
    }

    /// Position that centres an actor of size `actor` inside the bounds.
    #[must_use]
    pub fn centered(&self, rect: Rect, actor: Size) -> Point {
        Point::new(
            (rect.x + rect.width / 2.0) * self.width - actor.width / 2.0,
            (1.0 - (rect.y + rect.height / 2.0)) * self.height - actor.height / 2.0,
        )
    }
}
