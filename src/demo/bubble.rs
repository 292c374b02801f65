//! Bubbles
//!
//! Rise from the sea floor and disappear at the surface. A shark pops any
//! bubble it touches. The diver collects air bubbles for score; poison
//! bubbles hurt the diver instead (see `diver.rs`).

use std::time::Duration;

use crate::core::geometry::{PlayField, Position, Size};
use crate::core::movement::{Direction, Movement};
use crate::core::rng::SeededRng;
use crate::engine::entity::{Body, Capabilities, Entity, Shared};
use crate::engine::events::{CollisionSide, SceneBorder};
use crate::engine::spawner::{SpawnBatch, Spawner};
use crate::error::{ConfigError, HookResult};
use crate::Timestamp;

use super::{ReefConfig, Scoreboard};

/// Bubble diameter.
pub const DIAMETER: f64 = 20.0;

/// Tag of an air bubble.
pub const AIR_TAG: &str = "bubble";
/// Tag of a poison bubble.
pub const POISON_TAG: &str = "poison-bubble";

/// What the diver gets from a bubble.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BubbleKind {
    /// Counts toward the score
    Air,
    /// Costs the diver health
    Poison,
}

/// Rising bubble.
#[derive(Debug)]
pub struct Bubble {
    body: Body,
    kind: BubbleKind,
    scoreboard: Shared<Scoreboard>,
}

impl Bubble {
    /// Bubble at `position` rising at `speed`.
    pub fn new(position: Position, speed: f64, kind: BubbleKind, scoreboard: Shared<Scoreboard>) -> Self {
        let body = Body::new(position, Size::new(DIAMETER, DIAMETER))
            .with_movement(Movement::new(Direction::UP, speed));
        Self { body, kind, scoreboard }
    }

    /// Air or poison.
    pub fn kind(&self) -> BubbleKind {
        self.kind
    }
}

impl Entity for Bubble {
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
        match self.kind {
            BubbleKind::Air => AIR_TAG,
            BubbleKind::Poison => POISON_TAG,
        }
    }

    fn on_collision(&mut self, other: &dyn Entity, _side: CollisionSide) -> HookResult {
        match other.tag() {
            super::shark::TAG => self.body.remove(),
            super::diver::TAG => {
                if self.kind == BubbleKind::Air {
                    self.scoreboard.borrow_mut().pop();
                }
                self.body.remove();
            }
            _ => {}
        }
        Ok(())
    }

    fn on_boundary_crossing(&mut self, border: SceneBorder) -> HookResult {
        if border == SceneBorder::Top {
            self.body.remove();
        }
        Ok(())
    }
}

/// Spawner releasing waves of bubbles along the bottom of `field`.
pub fn spawner(
    config: &ReefConfig,
    field: PlayField,
    mut rng: SeededRng,
    scoreboard: Shared<Scoreboard>,
    now: Timestamp,
) -> Result<Spawner, ConfigError> {
    let per_wave = config.bubbles_per_wave;
    let poison_chance = config.poison_chance;
    let (slowest, fastest) = config.bubble_speed;

    let produce = move |batch: &mut SpawnBatch<'_>| {
        for _ in 0..per_wave {
            let x = rng.next_range(0.0, (field.width - DIAMETER).max(0.0));
            let speed = rng.next_range(slowest, fastest);
            let kind = if rng.chance(poison_chance) {
                BubbleKind::Poison
            } else {
                BubbleKind::Air
            };
            let position = Position::new(x, field.height - DIAMETER);
            batch.spawn(Bubble::new(position, speed, kind, scoreboard.clone()));
        }
    };

    Spawner::starting_at(Duration::from_millis(config.bubble_interval_ms), now, produce)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Bounds;
    use crate::engine::entity::{shared, Shared};

    struct Stub {
        body: Body,
        tag: &'static str,
    }

    impl Entity for Stub {
        fn body(&self) -> &Body {
            &self.body
        }

        fn body_mut(&mut self) -> &mut Body {
            &mut self.body
        }

        fn tag(&self) -> &'static str {
            self.tag
        }
    }

    fn stub(tag: &'static str) -> Stub {
        Stub {
            body: Body::new(Position::ORIGIN, Size::new(1.0, 1.0)),
            tag,
        }
    }

    fn bubble(kind: BubbleKind) -> (Bubble, Shared<Scoreboard>) {
        let board = shared(Scoreboard::new(5));
        (Bubble::new(Position::new(10.0, 10.0), 2.0, kind, board.clone()), board)
    }

    #[test]
    fn test_rises() {
        let (mut bubble, _) = bubble(BubbleKind::Air);
        bubble.body_mut().advance(1.0);
        assert_eq!(bubble.body().position(), Position::new(10.0, 8.0));
    }

    #[test]
    fn test_air_bubble_scores_on_diver() {
        let (mut bubble, board) = bubble(BubbleKind::Air);
        bubble.on_collision(&stub(super::super::diver::TAG), CollisionSide::Top).unwrap();
        assert!(bubble.is_removed());
        assert_eq!(board.borrow().popped, 1);
    }

    #[test]
    fn test_poison_bubble_does_not_score() {
        let (mut bubble, board) = bubble(BubbleKind::Poison);
        assert_eq!(bubble.tag(), POISON_TAG);
        bubble.on_collision(&stub(super::super::diver::TAG), CollisionSide::Top).unwrap();
        assert!(bubble.is_removed());
        assert_eq!(board.borrow().popped, 0);
    }

    #[test]
    fn test_shark_pops_without_score() {
        let (mut bubble, board) = bubble(BubbleKind::Air);
        bubble.on_collision(&stub(super::super::shark::TAG), CollisionSide::Left).unwrap();
        assert!(bubble.is_removed());
        assert_eq!(board.borrow().popped, 0);
    }

    #[test]
    fn test_only_top_border_removes() {
        let (mut bubble, _) = bubble(BubbleKind::Air);
        bubble.on_boundary_crossing(SceneBorder::Left).unwrap();
        assert!(!bubble.is_removed());
        bubble.on_boundary_crossing(SceneBorder::Top).unwrap();
        assert!(bubble.is_removed());
    }

    #[test]
    fn test_spawner_places_waves_on_floor() {
        let field = PlayField::new(300.0, 200.0);
        let config = ReefConfig {
            bubbles_per_wave: 4,
            bubble_interval_ms: 100,
            ..ReefConfig::default()
        };
        let board = shared(Scoreboard::new(5));
        let mut spawner = spawner(&config, field, SeededRng::new(7), board, 0).unwrap();

        assert!(spawner.poll(100_000_000));
        let wave = spawner.drain_and_clear();
        assert_eq!(wave.len(), 4);
        for entity in wave {
            let bounds: Bounds = entity.borrow().bounds();
            assert_eq!(bounds.y, field.height - DIAMETER);
            assert!(bounds.x >= 0.0 && bounds.right() <= field.width);
        }
    }
}
