//! Diver
//!
//! The player. Arrow keys steer at a fixed speed; releasing every key
//! stops. Sharks and poison bubbles cost one point of health each frame
//! they touch the diver, and the diver leaves the scene at zero.

use tracing::info;

use crate::core::geometry::{Position, Size};
use crate::core::movement::Direction;
use crate::engine::entity::{Body, Capabilities, Entity, Shared};
use crate::engine::events::CollisionSide;
use crate::engine::input::{Key, KeySet};
use crate::error::HookResult;

use super::Scoreboard;

/// Single-frame width of the diver sprite.
pub const WIDTH: f64 = 20.0;
/// Height of the diver sprite.
pub const HEIGHT: f64 = 40.0;
/// Swimming speed while a direction key is held.
pub const SPEED: f64 = 3.0;

/// Entity tag.
pub const TAG: &str = "diver";

/// Keyboard-driven player entity.
#[derive(Debug)]
pub struct Diver {
    body: Body,
    scoreboard: Shared<Scoreboard>,
    /// Sprite frame: 0 faces left, 1 faces right
    facing: u32,
}

impl Diver {
    /// Diver at `position` reporting to `scoreboard`.
    pub fn new(position: Position, scoreboard: Shared<Scoreboard>) -> Self {
        Self {
            body: Body::new(position, Size::animated(WIDTH, HEIGHT, 2)),
            scoreboard,
            facing: 1,
        }
    }

    /// Current sprite frame.
    pub fn facing(&self) -> u32 {
        self.facing
    }

    fn take_damage(&mut self) {
        let health = self.scoreboard.borrow_mut().damage();
        if health == 0 {
            info!("diver out of health");
            self.body.remove();
        }
    }
}

impl Entity for Diver {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::INPUT_AWARE | Capabilities::COLLIDABLE
    }

    fn tag(&self) -> &'static str {
        TAG
    }

    fn on_input(&mut self, keys: &KeySet) -> HookResult {
        let heading = if keys.contains(Key::Left) {
            self.facing = 0;
            Some(Direction::LEFT)
        } else if keys.contains(Key::Right) {
            self.facing = 1;
            Some(Direction::RIGHT)
        } else if keys.contains(Key::Up) {
            Some(Direction::UP)
        } else if keys.contains(Key::Down) {
            Some(Direction::DOWN)
        } else {
            None
        };

        match heading {
            Some(direction) => {
                self.body.set_direction(direction);
                self.body.set_speed(SPEED);
            }
            // Other keys leave the current heading alone
            None if keys.is_empty() => self.body.set_speed(0.0),
            None => {}
        }
        Ok(())
    }

    fn on_collision(&mut self, other: &dyn Entity, _side: CollisionSide) -> HookResult {
        if other.tag() == super::shark::TAG || other.tag() == super::bubble::POISON_TAG {
            self.take_damage();
        }
        Ok(())
    }
}
