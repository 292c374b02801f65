//! Core value primitives.
//!
//! Plain data with arithmetic only. Nothing here knows about entities,
//! frames or registries.

pub mod geometry;
pub mod movement;
pub mod rng;

// Re-export core types
pub use geometry::{Bounds, PlayField, Position, Size};
pub use movement::{Direction, Movement};
pub use rng::SeededRng;
