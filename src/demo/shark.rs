//! Sharks
//!
//! Cross the field left to right. On leaving through the right edge a
//! shark wraps back to just outside the left edge, until its laps run out.

use std::time::Duration;

use crate::core::geometry::{PlayField, Position, Size};
use crate::core::movement::{Direction, Movement};
use crate::core::rng::SeededRng;
use crate::engine::entity::{Body, Capabilities, Entity};
use crate::engine::events::SceneBorder;
use crate::engine::spawner::{SpawnBatch, Spawner};
use crate::error::{ConfigError, HookResult};
use crate::Timestamp;

use super::ReefConfig;

/// Single-frame width of the shark sprite.
pub const WIDTH: f64 = 60.0;
/// Height of the shark sprite.
pub const HEIGHT: f64 = 30.0;

/// Entity tag.
pub const TAG: &str = "shark";

/// Horizontally patrolling hazard.
#[derive(Debug)]
pub struct Shark {
    body: Body,
    laps_left: u32,
}

impl Shark {
    /// Shark at `position` swimming right at `speed` for `laps` crossings.
    pub fn new(position: Position, speed: f64, laps: u32) -> Self {
        let body = Body::new(position, Size::animated(WIDTH, HEIGHT, 4))
            .with_movement(Movement::new(Direction::RIGHT, speed));
        Self {
            body,
            laps_left: laps.max(1),
        }
    }

    /// Crossings remaining, including the current one.
    pub fn laps_left(&self) -> u32 {
        self.laps_left
    }
}

impl Entity for Shark {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::COLLIDABLE | Capabilities::BOUNDARY_AWARE
    }

    fn tag(&self) -> &'static str {
        TAG
    }

    fn on_boundary_crossing(&mut self, border: SceneBorder) -> HookResult {
        if border != SceneBorder::Right {
            return Ok(());
        }

        self.laps_left -= 1;
        if self.laps_left == 0 {
            self.body.remove();
        } else {
            let y = self.body.position().y;
            self.body.set_position(Position::new(-WIDTH, y));
        }
        Ok(())
    }
}

/// Spawner releasing one shark at a random depth per interval.
pub fn spawner(
    config: &ReefConfig,
    field: PlayField,
    mut rng: SeededRng,
    now: Timestamp,
) -> Result<Spawner, ConfigError> {
    let speed = config.shark_speed;
    let laps = config.shark_laps;

    let produce = move |batch: &mut SpawnBatch<'_>| {
        let y = rng.next_range(0.0, (field.height - HEIGHT).max(0.0));
        batch.spawn(Shark::new(Position::new(-WIDTH, y), speed, laps));
    };

    Spawner::starting_at(Duration::from_millis(config.shark_interval_ms), now, produce)
}
