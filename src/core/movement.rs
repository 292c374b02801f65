//! Directional Movement
//!
//! Constant-speed translation along a compass direction in degrees.
//!
//! ## Direction Convention
//!
//! ```text
//!                180 (up, -Y)
//!                     |
//!   270 (left, -X) ---+--- 90 (right, +X)
//!                     |
//!                 0 / 360 (down, +Y)
//! ```
//!
//! `unit(d) = (sin d, cos d)`. Scene Y grows downward, so 0 degrees moves
//! an entity toward the bottom of the screen.

use serde::{Deserialize, Serialize};

/// Named compass directions, in degrees.
pub struct Direction;

impl Direction {
    /// Toward increasing Y
    pub const DOWN: f64 = 0.0;
    /// Toward increasing X
    pub const RIGHT: f64 = 90.0;
    /// Toward decreasing Y
    pub const UP: f64 = 180.0;
    /// Toward decreasing X
    pub const LEFT: f64 = 270.0;
}

/// Direction and speed of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Direction in degrees (see module docs)
    pub direction: f64,
    /// Distance per step. 0 means stationary.
    pub speed: f64,
}

impl Movement {
    /// Not moving.
    pub const STATIONARY: Self = Self {
        direction: 0.0,
        speed: 0.0,
    };

    /// Create a new movement.
    pub const fn new(direction: f64, speed: f64) -> Self {
        Self { direction, speed }
    }

    /// Check whether this movement displaces anything.
    #[inline]
    pub fn is_stationary(&self) -> bool {
        self.speed == 0.0
    }

    /// Unit vector for the current direction.
    ///
    /// Values within `1e-12` of zero are snapped to zero so that axis-aligned
    /// directions do not drift on the perpendicular axis.
    pub fn unit_vector(&self) -> (f64, f64) {
        let radians = self.direction.to_radians();
        (snap(radians.sin()), snap(radians.cos()))
    }

    /// Displacement for one step scaled by `factor`.
    pub fn displacement(&self, factor: f64) -> (f64, f64) {
        if self.is_stationary() {
            return (0.0, 0.0);
        }
        let (ux, uy) = self.unit_vector();
        let distance = self.speed * factor;
        (ux * distance, uy * distance)
    }
}

#[inline]
fn snap(value: f64) -> f64 {
    if value.abs() < 1e-12 {
        0.0
    } else {
        value
    }
}
