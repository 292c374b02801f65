//! Reef Demo Scene
//!
//! Sample content driven entirely through the engine's public surface:
//!
//! - `diver`: keyboard-steered player that loses health to sharks and
//!   poison bubbles
//! - `bubble`: air and poison bubbles rising from the sea floor
//! - `shark`: sharks crossing left to right for a few laps
//!
//! Game state the entities share (health, popped bubbles) lives in a
//! [`Scoreboard`] behind a [`Shared`] handle.

pub mod bubble;
pub mod diver;
pub mod shark;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::geometry::Position;
use crate::core::rng::SeededRng;
use crate::engine::entity::{shared, Shared};
use crate::engine::registry::SpawnerId;
use crate::engine::scheduler::FrameScheduler;
use crate::error::ConfigError;
use crate::Timestamp;

pub use bubble::{Bubble, BubbleKind};
pub use diver::Diver;
pub use shark::Shark;

// =============================================================================
// SCOREBOARD
// =============================================================================

/// Health and score shared by the demo entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Diver health left
    pub health: u32,
    /// Air bubbles collected by the diver
    pub popped: u32,
    /// Set once the diver runs out of health
    pub diver_lost: bool,
}

impl Scoreboard {
    /// Fresh board with `health` points.
    pub fn new(health: u32) -> Self {
        Self {
            health,
            popped: 0,
            diver_lost: false,
        }
    }

    /// Take one point of damage and return the health left.
    pub fn damage(&mut self) -> u32 {
        self.health = self.health.saturating_sub(1);
        if self.health == 0 {
            self.diver_lost = true;
        }
        self.health
    }

    /// Count one collected air bubble.
    pub fn pop(&mut self) {
        self.popped += 1;
    }
}

// =============================================================================
// SCENE SETUP
// =============================================================================

/// Tuning for the reef scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReefConfig {
    /// Starting diver health
    pub diver_health: u32,
    /// Milliseconds between bubble waves
    pub bubble_interval_ms: u64,
    /// Bubbles per wave
    pub bubbles_per_wave: u32,
    /// Probability that a bubble is poisonous
    pub poison_chance: f64,
    /// Slowest and fastest bubble speed
    pub bubble_speed: (f64, f64),
    /// Milliseconds between sharks
    pub shark_interval_ms: u64,
    /// Shark speed
    pub shark_speed: f64,
    /// Times a shark crosses the field before leaving
    pub shark_laps: u32,
}

impl Default for ReefConfig {
    fn default() -> Self {
        Self {
            diver_health: 10,
            bubble_interval_ms: 400,
            bubbles_per_wave: 2,
            poison_chance: 0.1,
            bubble_speed: (1.0, 3.0),
            shark_interval_ms: 3_000,
            shark_speed: 2.0,
            shark_laps: 2,
        }
    }
}

/// Handles to everything [`populate`] put into the scene.
#[derive(Debug)]
pub struct Reef {
    /// Shared game state
    pub scoreboard: Shared<Scoreboard>,
    /// The player
    pub diver: Shared<Diver>,
    /// Bubble spawner
    pub bubbles: SpawnerId,
    /// Shark spawner
    pub sharks: SpawnerId,
}

/// Register the diver and both spawners with the scheduler's registry.
///
/// Spawner clocks start at `now`. The same `seed` always yields the same
/// sequence of bubbles and sharks.
pub fn populate(
    scheduler: &mut FrameScheduler,
    config: &ReefConfig,
    seed: u64,
    now: Timestamp,
) -> Result<Reef, ConfigError> {
    let field = scheduler.registry().monitor().field();
    let scoreboard = shared(Scoreboard::new(config.diver_health));

    let mut seeds = SeededRng::new(seed);
    let bubble_spawner = bubble::spawner(config, field, SeededRng::new(seeds.next_u64()), scoreboard.clone(), now)?;
    let shark_spawner = shark::spawner(config, field, SeededRng::new(seeds.next_u64()), now)?;

    let start = Position::new(field.width / 2.0 - diver::WIDTH / 2.0, field.height / 2.0);
    let registry = scheduler.registry_mut();
    let diver = registry.register_entity(Diver::new(start, scoreboard.clone()));
    let bubbles = registry.register_spawner(bubble_spawner);
    let sharks = registry.register_spawner(shark_spawner);

    info!(seed, width = field.width, height = field.height, "reef populated");

    Ok(Reef {
        scoreboard,
        diver,
        bubbles,
        sharks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoreboard_damage_until_lost() {
        let mut board = Scoreboard::new(2);
        assert_eq!(board.damage(), 1);
        assert!(!board.diver_lost);
        assert_eq!(board.damage(), 0);
        assert!(board.diver_lost);
        // Never underflows
        assert_eq!(board.damage(), 0);
    }

    #[test]
    fn test_reef_config_partial_json() {
        let config: ReefConfig = serde_json::from_str(r#"{"diver_health": 3}"#).unwrap();
        assert_eq!(config.diver_health, 3);
        assert_eq!(config.shark_laps, ReefConfig::default().shark_laps);
    }
}
