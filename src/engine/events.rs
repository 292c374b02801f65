//! Frame Events
//!
//! Everything notable that happened during one frame, in the order it
//! happened. Returned from every update for logging, replay checks and tests.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::entity::EntityId;
use crate::engine::registry::SpawnerId;
use crate::engine::stats::FrameStats;
use crate::error::HookError;
use crate::Timestamp;

/// Face of an entity's bounds that was struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CollisionSide {
    /// Upper face
    Top,
    /// Lower face
    Bottom,
    /// Left face
    Left,
    /// Right face
    Right,
}

/// Edge of the play-field an entity moved past.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SceneBorder {
    /// Above y = 0
    Top,
    /// Below the field height
    Bottom,
    /// Left of x = 0
    Left,
    /// Right of the field width
    Right,
}

/// Entity hook that produced a fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hook {
    /// `Entity::on_input`
    Input,
    /// `Entity::update`
    Update,
    /// `Entity::on_collision`
    Collision,
    /// `Entity::on_boundary_crossing`
    Boundary,
}

/// Where a newly merged entity came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnSource {
    /// Registered directly or pushed through an `EntityQueue`
    Queue,
    /// Drained from a spawner's buffer
    Spawner(SpawnerId),
}

/// One notable occurrence inside a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FrameEvent {
    /// Entity joined the live set
    Spawned {
        /// Id assigned on merge
        entity: EntityId,
        /// Queue or spawner it came from
        source: SpawnSource,
    },

    /// `entity` was notified that `other` struck its `side`
    Collision {
        /// Entity that was notified
        entity: EntityId,
        /// Entity that struck it
        other: EntityId,
        /// Struck face of `entity`
        side: CollisionSide,
    },

    /// Entity was notified that it left the field past `border`
    BoundaryCrossed {
        /// Entity that was notified
        entity: EntityId,
        /// Edge it moved past
        border: SceneBorder,
    },

    /// Entity was purged at the end of the frame
    Removed {
        /// Id of the purged entity
        entity: EntityId,
    },

    /// An entity hook failed; the frame carried on without it
    HookFault {
        /// Entity whose hook failed
        entity: EntityId,
        /// Which hook
        hook: Hook,
        /// Rendered error
        message: String,
    },
}

/// Result of one registry update.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FrameReport {
    /// Host timestamp of this frame
    pub timestamp: Timestamp,
    /// Events in occurrence order
    pub events: Vec<FrameEvent>,
    /// Counters published to the statistics observer
    pub stats: FrameStats,
}

impl FrameReport {
    pub(crate) fn new(frame: u64, timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            events: Vec::new(),
            stats: FrameStats {
                frame,
                ..FrameStats::default()
            },
        }
    }

    /// Frame number (1-based).
    pub fn frame(&self) -> u64 {
        self.stats.frame
    }

    pub(crate) fn push(&mut self, event: FrameEvent) {
        self.events.push(event);
    }

    /// Log and record a failed hook.
    pub(crate) fn fault(&mut self, entity: EntityId, hook: Hook, err: HookError) {
        warn!(frame = self.stats.frame, %entity, ?hook, "entity hook failed: {}", err);
        self.stats.faults += 1;
        self.events.push(FrameEvent::HookFault {
            entity,
            hook,
            message: err.to_string(),
        });
    }

    /// Collision notifications delivered to `entity` this frame.
    pub fn collisions_of(&self, entity: EntityId) -> impl Iterator<Item = (EntityId, CollisionSide)> + '_ {
        self.events.iter().filter_map(move |event| match event {
            FrameEvent::Collision { entity: e, other, side } if *e == entity => Some((*other, *side)),
            _ => None,
        })
    }

    /// Boundary notification delivered to `entity` this frame, if any.
    pub fn crossing_of(&self, entity: EntityId) -> Option<SceneBorder> {
        self.events.iter().find_map(|event| match event {
            FrameEvent::BoundaryCrossed { entity: e, border } if *e == entity => Some(*border),
            _ => None,
        })
    }

    /// Ids purged at the end of this frame.
    pub fn removed(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.events.iter().filter_map(|event| match event {
            FrameEvent::Removed { entity } => Some(*entity),
            _ => None,
        })
    }
}
