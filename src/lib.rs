//! # Reef Engine
//!
//! Entity lifecycle, collision and boundary handling for small real-time
//! 2D games, plus the "reef" demo scene built on top of it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        REEF ENGINE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Plain value types                        │
//! │  ├── geometry.rs  - Position, size, bounds, play-field       │
//! │  ├── movement.rs  - Direction and speed                      │
//! │  └── rng.rs       - Seeded Xorshift128+ PRNG                 │
//! │                                                              │
//! │  engine/          - Entity lifecycle and frame pipeline      │
//! │  ├── entity.rs    - Entity trait and body state              │
//! │  ├── spawner.rs   - Interval-driven producers                │
//! │  ├── collision.rs - Pair detection and dispatch              │
//! │  ├── boundary.rs  - Play-field edge detection                │
//! │  ├── registry.rs  - Live set and ordered frame step          │
//! │  └── scheduler.rs - Host pulse to registry update            │
//! │                                                              │
//! │  demo/            - Diver, bubbles and sharks                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frame Order
//!
//! Every update runs spawn merge, input, update and movement, collisions,
//! boundaries, purge and statistics, in that order. Entities are only
//! marked for removal during a frame and leave the live set in the purge.
//!
//! ## Threading
//!
//! Single-threaded. Entities are shared as `Rc<RefCell<_>>` and all hooks
//! run on the thread that drives the scheduler.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod demo;
pub mod engine;
pub mod error;

// Re-export commonly used types
pub use config::{EngineConfig, TimeStep};
pub use crate::core::{Bounds, Direction, Movement, PlayField, Position, SeededRng, Size};
pub use engine::{
    Body, Capabilities, CollisionSide, Entity, EntityId, EntityRegistry, FrameEvent, FrameReport,
    FrameScheduler, FrameStats, Key, KeySet, SceneBorder, Spawner,
};
pub use error::{ConfigError, HookError, HookResult};

/// Host timestamp in nanoseconds from an arbitrary monotonic origin.
pub type Timestamp = u64;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal pulse rate of the demo host (Hz)
pub const PULSE_RATE: u32 = 60;
