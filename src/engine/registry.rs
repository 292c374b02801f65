//! Entity Registry
//!
//! The authoritative live set for one scene, and the frame step that runs
//! over it. Each update runs these phases in this fixed order:
//!
//! 1. Merge pending registrations and drained spawner batches
//! 2. Deliver pressed keys to INPUT_AWARE entities
//! 3. Run each entity's update hook, then apply its movement
//! 4. Resolve collisions between COLLIDABLE entities
//! 5. Check BOUNDARY_AWARE entities against the play-field
//! 6. Purge everything marked removed during 2–5
//! 7. Publish statistics
//!
//! Nothing is removed from the live set mid-scan: entities are marked in
//! phases 2–5 and purged in phase 6. Every phase skips marked entities, so
//! a removed entity receives no further hooks after the marking point.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::config::{EngineConfig, TimeStep};
use crate::engine::boundary::BoundaryMonitor;
use crate::engine::collision::{BroadPhase, Collider, CollisionResolver};
use crate::engine::entity::{
    same_entity, shared, Capabilities, Entity, EntityId, EntityRef, Shared,
};
use crate::engine::events::{FrameEvent, FrameReport, Hook, SpawnSource};
use crate::engine::input::KeySet;
use crate::engine::queue::EntityQueue;
use crate::engine::spawner::Spawner;
use crate::engine::stats::StatisticsObserver;
use crate::error::HookError;
use crate::Timestamp;

/// Handle to a registered spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpawnerId(pub u32);

/// One live entity.
pub(crate) struct Slot {
    pub(crate) id: EntityId,
    pub(crate) entity: EntityRef,
}

/// Live entity set plus the spawners that feed it.
pub struct EntityRegistry {
    live: Vec<Slot>,
    pending: EntityQueue,
    /// BTreeMap keeps spawner polling order stable
    spawners: BTreeMap<SpawnerId, Spawner>,
    next_entity_id: u64,
    next_spawner_id: u32,
    frame: u64,
    last_timestamp: Option<Timestamp>,
    time_step: TimeStep,
    monitor: BoundaryMonitor,
    resolver: CollisionResolver,
    observer: Option<Box<dyn StatisticsObserver>>,
}

impl EntityRegistry {
    /// Empty registry for the given configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            live: Vec::new(),
            pending: EntityQueue::new(),
            spawners: BTreeMap::new(),
            next_entity_id: 1,
            next_spawner_id: 1,
            frame: 0,
            last_timestamp: None,
            time_step: config.time_step,
            monitor: BoundaryMonitor::new(config.field),
            resolver: CollisionResolver::default(),
            observer: None,
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Queue an entity to join the live set at the start of the next update.
    ///
    /// Registering an entity that is already live or already queued does
    /// nothing and returns false.
    pub fn register(&mut self, entity: EntityRef) -> bool {
        if self.contains(&entity) || self.pending.contains(&entity) {
            trace!("duplicate registration ignored");
            return false;
        }
        self.pending.push(entity)
    }

    /// Wrap and register `entity`, returning a typed handle to it.
    pub fn register_entity<E: Entity + 'static>(&mut self, entity: E) -> Shared<E> {
        let handle = shared(entity);
        let entity_ref: EntityRef = handle.clone();
        self.register(entity_ref);
        handle
    }

    /// Shared handle to the pending queue. Entities pushed through it join
    /// on the next update, just like [`EntityRegistry::register`].
    pub fn queue(&self) -> EntityQueue {
        self.pending.clone()
    }

    /// Add a spawner; its buffer is drained on every update from now on.
    pub fn register_spawner(&mut self, spawner: Spawner) -> SpawnerId {
        let id = SpawnerId(self.next_spawner_id);
        self.next_spawner_id += 1;
        self.spawners.insert(id, spawner);
        id
    }

    /// Tear down one spawner, discarding its undrained buffer.
    pub fn destroy_spawner(&mut self, id: SpawnerId) -> bool {
        match self.spawners.remove(&id) {
            Some(mut spawner) => {
                spawner.destroy();
                true
            }
            None => false,
        }
    }

    /// Number of registered spawners.
    pub fn spawner_count(&self) -> usize {
        self.spawners.len()
    }

    /// Attach the statistics observer, replacing any previous one.
    pub fn set_statistics_observer(&mut self, observer: impl StatisticsObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Detach the statistics observer.
    pub fn clear_statistics_observer(&mut self) {
        self.observer = None;
    }

    /// Swap the collision broad phase.
    pub fn set_broad_phase(&mut self, broad_phase: Box<dyn BroadPhase>) {
        self.resolver.set_broad_phase(broad_phase);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// True if nothing is live.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Frames run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The boundary monitor in use.
    pub fn monitor(&self) -> &BoundaryMonitor {
        &self.monitor
    }

    /// Is `entity` in the live set?
    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.live.iter().any(|slot| same_entity(&slot.entity, entity))
    }

    /// Id assigned to `entity`, if it is live.
    pub fn id_of(&self, entity: &EntityRef) -> Option<EntityId> {
        self.live
            .iter()
            .find(|slot| same_entity(&slot.entity, entity))
            .map(|slot| slot.id)
    }

    /// Live entities in iteration order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &EntityRef)> + '_ {
        self.live.iter().map(|slot| (slot.id, &slot.entity))
    }

    // =========================================================================
    // Frame step
    // =========================================================================

    /// Merge pending entities and publish statistics without moving,
    /// colliding or checking anything. Used once when a scene is activated.
    pub fn initial_update(&mut self, now: Timestamp) -> FrameReport {
        self.last_timestamp = Some(now);
        let mut report = FrameReport::new(self.frame, now);
        self.merge_queue(&mut report);
        self.publish(&mut report);
        report
    }

    /// Run one frame.
    pub fn update(&mut self, now: Timestamp, keys: &KeySet) -> FrameReport {
        self.frame += 1;
        let elapsed = self.last_timestamp.map(|last| now.saturating_sub(last));
        self.last_timestamp = Some(now);

        let mut report = FrameReport::new(self.frame, now);

        // 1. Spawn merge
        self.merge_queue(&mut report);
        self.merge_spawners(now, &mut report);

        // 2. Input
        self.deliver_input(keys, &mut report);

        // 3. Update hooks and movement
        let factor = self.step_factor(elapsed);
        self.advance(now, factor, &mut report);

        // 4. Collisions
        self.resolve_collisions(&mut report);

        // 5. Boundaries
        self.check_boundaries(&mut report);

        // 6. Purge
        self.purge(&mut report);

        // 7. Statistics
        self.publish(&mut report);

        report
    }

    /// Tear down every spawner and drop all live and pending entities.
    pub fn clear(&mut self) {
        for spawner in self.spawners.values_mut() {
            spawner.destroy();
        }
        self.spawners.clear();
        self.pending.clear();
        let dropped = self.live.len();
        self.live.clear();
        info!(dropped, "registry cleared");
    }

    fn merge_queue(&mut self, report: &mut FrameReport) {
        for entity in self.pending.drain() {
            self.admit(entity, SpawnSource::Queue, report);
        }
    }

    fn merge_spawners(&mut self, now: Timestamp, report: &mut FrameReport) {
        let mut batches = Vec::new();
        for (id, spawner) in self.spawners.iter_mut() {
            spawner.poll(now);
            let batch = spawner.drain_and_clear();
            if !batch.is_empty() {
                batches.push((*id, batch));
            }
        }

        for (id, batch) in batches {
            for entity in batch {
                self.admit(entity, SpawnSource::Spawner(id), report);
            }
        }
    }

    fn admit(&mut self, entity: EntityRef, source: SpawnSource, report: &mut FrameReport) {
        if self.contains(&entity) {
            return;
        }
        // Marked before it ever joined; nothing to purge later.
        if entity.try_borrow().map(|e| e.is_removed()).unwrap_or(false) {
            return;
        }

        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        self.live.push(Slot { id, entity });
        report.stats.spawned += 1;
        report.push(FrameEvent::Spawned { entity: id, source });
    }

    fn deliver_input(&self, keys: &KeySet, report: &mut FrameReport) {
        for slot in &self.live {
            let Some(mut entity) = borrow_live(slot, Hook::Input, report) else {
                continue;
            };
            if !entity.capabilities().contains(Capabilities::INPUT_AWARE) {
                continue;
            }
            if let Err(err) = entity.on_input(keys) {
                report.fault(slot.id, Hook::Input, err);
            }
        }
    }

    fn step_factor(&self, elapsed: Option<u64>) -> f64 {
        match (self.time_step, elapsed) {
            (TimeStep::PerFrame, _) | (TimeStep::Scaled { .. }, None) => 1.0,
            (TimeStep::Scaled { reference_frame_nanos }, Some(elapsed)) => {
                elapsed as f64 / reference_frame_nanos.max(1) as f64
            }
        }
    }

    fn advance(&self, now: Timestamp, factor: f64, report: &mut FrameReport) {
        for slot in &self.live {
            let Some(mut entity) = borrow_live(slot, Hook::Update, report) else {
                continue;
            };
            if let Err(err) = entity.update(now) {
                report.fault(slot.id, Hook::Update, err);
            }
            if !entity.is_removed() {
                entity.body_mut().advance(factor);
            }
        }
    }

    fn resolve_collisions(&mut self, report: &mut FrameReport) {
        let mut colliders = Vec::new();
        for (index, slot) in self.live.iter().enumerate() {
            let Ok(entity) = slot.entity.try_borrow() else {
                report.fault(slot.id, Hook::Collision, HookError::msg("entity already borrowed"));
                continue;
            };
            if entity.capabilities().contains(Capabilities::COLLIDABLE) && !entity.is_removed() {
                colliders.push(Collider {
                    slot: index,
                    bounds: entity.bounds(),
                });
            }
        }

        if colliders.len() < 2 {
            return;
        }

        let contacts = self.resolver.contacts(&colliders);
        self.resolver.dispatch(&self.live, &contacts, report);
    }

    fn check_boundaries(&self, report: &mut FrameReport) {
        for slot in &self.live {
            let Some(mut entity) = borrow_live(slot, Hook::Boundary, report) else {
                continue;
            };
            if !entity.capabilities().contains(Capabilities::BOUNDARY_AWARE) {
                continue;
            }
            let Some(border) = self.monitor.observe(entity.body_mut()) else {
                continue;
            };
            report.push(FrameEvent::BoundaryCrossed {
                entity: slot.id,
                border,
            });
            if let Err(err) = entity.on_boundary_crossing(border) {
                report.fault(slot.id, Hook::Boundary, err);
            }
        }
    }

    fn purge(&mut self, report: &mut FrameReport) {
        let mut removed = Vec::new();
        self.live.retain(|slot| {
            let gone = slot.entity.try_borrow().map(|e| e.is_removed()).unwrap_or(false);
            if gone {
                removed.push(slot.id);
            }
            !gone
        });

        if !removed.is_empty() {
            trace!(frame = self.frame, count = removed.len(), "purged removed entities");
        }
        report.stats.removed = removed.len();
        for id in removed {
            report.push(FrameEvent::Removed { entity: id });
        }
    }

    fn publish(&mut self, report: &mut FrameReport) {
        report.stats.live_entities = self.live.len();
        report.stats.spawners = self.spawners.len();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_frame(&report.stats);
        }
    }
}

/// Mutably borrow a slot's entity if it is still live.
///
/// A borrow conflict means game code is holding the entity across the
/// frame; it is reported as a fault and the entity is skipped.
fn borrow_live<'a>(
    slot: &'a Slot,
    hook: Hook,
    report: &mut FrameReport,
) -> Option<std::cell::RefMut<'a, dyn Entity>> {
    match slot.entity.try_borrow_mut() {
        Ok(entity) if entity.is_removed() => None,
        Ok(entity) => Some(entity),
        Err(_) => {
            report.fault(slot.id, hook, HookError::msg("entity already borrowed"));
            None
        }
    }
}

impl Drop for EntityRegistry {
    fn drop(&mut self) {
        for spawner in self.spawners.values_mut() {
            spawner.destroy();
        }
    }
}

impl fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("live", &self.live.len())
            .field("pending", &self.pending.len())
            .field("spawners", &self.spawners.len())
            .field("frame", &self.frame)
            .field("monitor", &self.monitor)
            .finish_non_exhaustive()
    }
}
