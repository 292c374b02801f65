//! Timed Spawners
//!
//! A spawner produces entities on its own cadence and buffers them until the
//! registry drains it. There is no timer thread: the registry polls every
//! spawner from the host pulse, and the spawner compares the pulse timestamp
//! against its own last-fire time.
//!
//! ```text
//! pulse ──► registry.update(now)
//!             └─ for each spawner: poll(now) ─► produce() ─► buffer
//!                                  drain_and_clear() ◄────────┘
//! ```

use std::fmt;
use std::time::Duration;

use tracing::{info, trace};

use crate::engine::entity::{shared, Entity, EntityRef, Shared};
use crate::error::ConfigError;
use crate::Timestamp;

// =============================================================================
// PRODUCTION HOOK
// =============================================================================

/// Handed to a producer each time its spawner fires.
pub struct SpawnBatch<'a> {
    buffer: &'a mut Vec<EntityRef>,
    now: Timestamp,
}

impl SpawnBatch<'_> {
    /// Timestamp of the pulse that fired the spawner.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Buffer an already-shared entity.
    pub fn spawn_ref(&mut self, entity: EntityRef) {
        self.buffer.push(entity);
    }

    /// Wrap, buffer and return a typed handle to `entity`.
    pub fn spawn<E: Entity + 'static>(&mut self, entity: E) -> Shared<E> {
        let handle = shared(entity);
        let entity_ref: EntityRef = handle.clone();
        self.buffer.push(entity_ref);
        handle
    }
}

/// Production hook of a spawner. May spawn zero, one or many entities.
pub trait Produce {
    /// Called once per firing.
    fn produce(&mut self, batch: &mut SpawnBatch<'_>);
}

impl<F> Produce for F
where
    F: FnMut(&mut SpawnBatch<'_>),
{
    fn produce(&mut self, batch: &mut SpawnBatch<'_>) {
        self(batch)
    }
}

// =============================================================================
// SPAWNER
// =============================================================================

/// Interval-driven entity producer with an internal buffer.
pub struct Spawner {
    interval: Duration,
    /// `None` until the first pulse is observed
    last_fire: Option<Timestamp>,
    buffer: Vec<EntityRef>,
    producer: Box<dyn Produce>,
    active: bool,
    fired: u64,
}

impl Spawner {
    /// Create a spawner whose clock starts at the first pulse it sees.
    ///
    /// A zero interval would fire on every pulse and is rejected.
    pub fn new(interval: Duration, producer: impl Produce + 'static) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::InvalidInterval);
        }
        Ok(Self {
            interval,
            last_fire: None,
            buffer: Vec::new(),
            producer: Box::new(producer),
            active: true,
            fired: 0,
        })
    }

    /// Create a spawner whose clock starts at `now`.
    pub fn starting_at(
        interval: Duration,
        now: Timestamp,
        producer: impl Produce + 'static,
    ) -> Result<Self, ConfigError> {
        let mut spawner = Self::new(interval, producer)?;
        spawner.last_fire = Some(now);
        Ok(spawner)
    }

    /// Minimum time between firings.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of times the producer has run.
    pub fn fire_count(&self) -> u64 {
        self.fired
    }

    /// Entities produced but not yet drained.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// False once destroyed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Check the clock and run the producer once if the interval has elapsed.
    ///
    /// Returns true if the producer ran. The first pulse only starts the
    /// clock of a spawner built with [`Spawner::new`].
    pub fn poll(&mut self, now: Timestamp) -> bool {
        if !self.active {
            return false;
        }

        let Some(last) = self.last_fire else {
            self.last_fire = Some(now);
            return false;
        };

        let interval = u64::try_from(self.interval.as_nanos()).unwrap_or(u64::MAX);
        if now.saturating_sub(last) < interval {
            return false;
        }

        let before = self.buffer.len();
        let mut batch = SpawnBatch {
            buffer: &mut self.buffer,
            now,
        };
        self.producer.produce(&mut batch);
        self.last_fire = Some(now);
        self.fired += 1;

        trace!(now, produced = self.buffer.len() - before, "spawner fired");
        true
    }

    /// Return the whole buffer and leave it empty, in one step.
    ///
    /// Never returns an entity twice; an empty buffer yields an empty vec.
    pub fn drain_and_clear(&mut self) -> Vec<EntityRef> {
        std::mem::take(&mut self.buffer)
    }

    /// Stop producing and discard anything not yet drained.
    pub fn destroy(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        let discarded = self.buffer.len();
        self.buffer.clear();
        info!(discarded, fired = self.fired, "spawner destroyed");
    }
}

impl fmt::Debug for Spawner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spawner")
            .field("interval", &self.interval)
            .field("last_fire", &self.last_fire)
            .field("pending", &self.buffer.len())
            .field("active", &self.active)
            .field("fired", &self.fired)
            .finish_non_exhaustive()
    }
}
