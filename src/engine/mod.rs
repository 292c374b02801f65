//! Engine Module
//!
//! Entity lifecycle and the per-frame pipeline.
//!
//! ## Module Structure
//!
//! - `entity`: Entity trait, shared handles, body state
//! - `input`: Key identifiers and pressed-key sets
//! - `events`: Frame events and the per-frame report
//! - `queue`: Pending registrations shared with game code
//! - `spawner`: Interval-driven entity producers
//! - `collision`: Broad phase, impact sides, notification dispatch
//! - `boundary`: Play-field edge detection
//! - `stats`: Frame counters and observers
//! - `registry`: Live set and the ordered frame step
//! - `scheduler`: Pulse-driven driver for one scene

pub mod boundary;
pub mod collision;
pub mod entity;
pub mod events;
pub mod input;
pub mod queue;
pub mod registry;
pub mod scheduler;
pub mod spawner;
pub mod stats;

// Re-export key types
pub use boundary::BoundaryMonitor;
pub use collision::{BroadPhase, Collider, CollisionResolver, Contact, PairwiseScan};
pub use entity::{shared, Body, Capabilities, Entity, EntityId, EntityRef, Presentation, Shared};
pub use events::{CollisionSide, FrameEvent, FrameReport, Hook, SceneBorder, SpawnSource};
pub use input::{Key, KeySet};
pub use queue::EntityQueue;
pub use registry::{EntityRegistry, SpawnerId};
pub use scheduler::FrameScheduler;
pub use spawner::{Produce, SpawnBatch, Spawner};
pub use stats::{FrameStats, SharedStats, StatisticsObserver};
