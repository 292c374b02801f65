//! Entity Contract
//!
//! An entity is game code wrapped around a [`Body`]: the fixed record of
//! position, size, movement and the `removed` flag. What an entity takes
//! part in is declared through [`Capabilities`], and the registry
//! dispatches on those flags rather than on concrete types.
//!
//! Entities are shared as `Rc<RefCell<dyn Entity>>` so game code can keep a
//! typed handle (`Shared<Diver>`) to an entity the registry owns. Identity
//! is pointer identity of that `Rc`.

use std::cell::RefCell;
use std::fmt;
use std::ops::BitOr;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::geometry::{Bounds, Position, Size};
use crate::core::movement::Movement;
use crate::engine::events::SceneBorder;
use crate::engine::events::CollisionSide;
use crate::engine::input::KeySet;
use crate::error::HookResult;
use crate::Timestamp;

/// Shared, mutable handle to a concrete value.
pub type Shared<T> = Rc<RefCell<T>>;

/// Shared handle to any entity, as stored by the registry.
pub type EntityRef = Rc<RefCell<dyn Entity>>;

/// Wrap a value in a [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Pointer identity of two entity handles.
#[inline]
pub fn same_entity(a: &EntityRef, b: &EntityRef) -> bool {
    // Compare data pointers only; vtable pointers may differ across codegen units.
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

// =============================================================================
// ENTITY ID
// =============================================================================

/// Registry-assigned id, handed out when an entity joins the live set.
///
/// Ids are monotonic per registry and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Set of optional capabilities an entity opts into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities(u8);

impl Capabilities {
    /// Plain entity: updated and moved, nothing else
    pub const NONE: Self = Self(0);
    /// Takes part in collision resolution
    pub const COLLIDABLE: Self = Self(0x01);
    /// Notified when it leaves the play-field
    pub const BOUNDARY_AWARE: Self = Self(0x02);
    /// Receives the pressed-key set each frame
    pub const INPUT_AWARE: Self = Self(0x04);

    /// True if every flag in `other` is set here.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// =============================================================================
// PRESENTATION
// =============================================================================

/// Visual counterpart of an entity, owned by its body.
///
/// The engine never calls this directly: the body forwards position changes
/// and its own removal.
pub trait Presentation {
    /// Bounds changed; redraw at the new place.
    fn sync(&mut self, bounds: Bounds);

    /// The entity was removed; hide and release the visual.
    fn dispose(&mut self);
}

// =============================================================================
// BODY
// =============================================================================

/// Fixed state record carried by every entity.
pub struct Body {
    position: Position,
    size: Size,
    movement: Movement,
    removed: bool,
    /// Border reported by the last boundary check (edge trigger state)
    crossing: Option<SceneBorder>,
    presentation: Option<Box<dyn Presentation>>,
}

impl Body {
    /// Stationary body at `position`.
    pub fn new(position: Position, size: Size) -> Self {
        Self {
            position,
            size,
            movement: Movement::STATIONARY,
            removed: false,
            crossing: None,
            presentation: None,
        }
    }

    /// Builder: initial movement.
    pub fn with_movement(mut self, movement: Movement) -> Self {
        self.movement = movement;
        self
    }

    /// Builder: attach a visual.
    pub fn with_presentation(mut self, mut presentation: Box<dyn Presentation>) -> Self {
        presentation.sync(self.bounds());
        self.presentation = Some(presentation);
        self
    }

    /// Top-left corner.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Sprite size.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Current movement vector.
    #[inline]
    pub fn movement(&self) -> Movement {
        self.movement
    }

    /// Current bounds, derived from position and single-frame size.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::from_parts(self.position, self.size)
    }

    /// Move to an absolute position.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
        let bounds = self.bounds();
        if let Some(presentation) = self.presentation.as_mut() {
            presentation.sync(bounds);
        }
    }

    /// Replace the movement vector.
    pub fn set_movement(&mut self, movement: Movement) {
        self.movement = movement;
    }

    /// Change speed, keeping direction.
    pub fn set_speed(&mut self, speed: f64) {
        self.movement.speed = speed;
    }

    /// Change direction (degrees), keeping speed.
    pub fn set_direction(&mut self, direction: f64) {
        self.movement.direction = direction;
    }

    /// Apply one step of movement, scaled by `factor`.
    pub fn advance(&mut self, factor: f64) {
        if self.movement.is_stationary() {
            return;
        }
        let (dx, dy) = self.movement.displacement(factor);
        self.set_position(self.position.translate(dx, dy));
    }

    /// Mark for removal. The registry purges the entity at the end of the
    /// current frame. Idempotent.
    pub fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        self.movement = Movement::STATIONARY;
        if let Some(presentation) = self.presentation.as_mut() {
            presentation.dispose();
        }
    }

    /// Marked for removal?
    #[inline]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Record the latest boundary result and return the previous one.
    pub(crate) fn replace_crossing(&mut self, crossing: Option<SceneBorder>) -> Option<SceneBorder> {
        std::mem::replace(&mut self.crossing, crossing)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("position", &self.position)
            .field("size", &self.size)
            .field("movement", &self.movement)
            .field("removed", &self.removed)
            .field("crossing", &self.crossing)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// ENTITY
// =============================================================================

/// A unit of game content.
///
/// Only `body`/`body_mut` are required. Every hook defaults to doing
/// nothing; a hook is only called if the matching capability is declared.
/// Hooks may mutate their own entity (including `body_mut().remove()`) and
/// nothing else.
pub trait Entity {
    /// Fixed state record.
    fn body(&self) -> &Body;

    /// Mutable access to the state record.
    fn body_mut(&mut self) -> &mut Body;

    /// Capabilities this entity opts into.
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    /// Short label game code can use to tell other entities apart in
    /// collision handlers.
    fn tag(&self) -> &'static str {
        "entity"
    }

    /// Per-frame hook, called before movement is applied.
    fn update(&mut self, _now: Timestamp) -> HookResult {
        Ok(())
    }

    /// Pressed keys for this frame (INPUT_AWARE only).
    fn on_input(&mut self, _keys: &KeySet) -> HookResult {
        Ok(())
    }

    /// `other` struck this entity on `side` of its own bounds (COLLIDABLE only).
    fn on_collision(&mut self, _other: &dyn Entity, _side: CollisionSide) -> HookResult {
        Ok(())
    }

    /// This entity left the field past `border` (BOUNDARY_AWARE only).
    fn on_boundary_crossing(&mut self, _border: SceneBorder) -> HookResult {
        Ok(())
    }

    /// Current bounds.
    fn bounds(&self) -> Bounds {
        self.body().bounds()
    }

    /// Has this entity been marked for removal?
    fn is_removed(&self) -> bool {
        self.body().is_removed()
    }
}
