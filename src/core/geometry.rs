//! Geometry Primitives
//!
//! Scene-space value types. Y grows downward, so `top` is the smaller
//! Y coordinate of a box and `bottom` the larger one.

use serde::{Deserialize, Serialize};

// =============================================================================
// POSITION
// =============================================================================

/// Top-left corner of an entity in scene coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Position {
    /// Origin of the scene.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new position.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return a new position shifted by `(dx, dy)`.
    #[inline]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

// =============================================================================
// SIZE
// =============================================================================

/// Extent of an entity.
///
/// Animated sprites keep all their frames side by side in one strip;
/// `frames` records how many, while `width` is always a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width of one frame
    pub width: f64,
    /// Height
    pub height: f64,
    /// Number of frames in the sprite strip (1 for still images)
    pub frames: u32,
}

impl Size {
    /// Create a single-frame size. Negative extents are clamped to zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self::animated(width, height, 1)
    }

    /// Create a size for a sprite strip of `frames` frames.
    pub fn animated(width: f64, height: f64, frames: u32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            frames: frames.max(1),
        }
    }

    /// Width of the whole strip.
    #[inline]
    pub fn strip_width(&self) -> f64 {
        self.width * self.frames as f64
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

// =============================================================================
// BOUNDS
// =============================================================================

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Bounds {
    /// Create bounds from raw components.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Bounds of a single frame of `size` placed at `position`.
    #[inline]
    pub fn from_parts(position: Position, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    /// Left edge (smallest X).
    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge (smallest Y).
    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict AABB overlap. Boxes that only share an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.bottom() > other.top()
            && self.top() < other.bottom()
    }

    /// Center point.
    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// =============================================================================
// PLAY FIELD
// =============================================================================

/// Visible play-field, spanning `(0, 0)` to `(width, height)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    /// Field width
    pub width: f64,
    /// Field height
    pub height: f64,
}

impl PlayField {
    /// Create a new play-field.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check that both extents are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for PlayField {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}
