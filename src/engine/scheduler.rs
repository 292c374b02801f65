//! Frame Scheduler
//!
//! Owns the registry of the active scene and turns the host's periodic
//! pulse into registry updates. The host calls [`FrameScheduler::tick`]
//! with a monotonic timestamp in nanoseconds; input arrives separately
//! through [`FrameScheduler::set_input`] and is sampled at the next tick.
//!
//! ```text
//! host pulse ──► tick(now) ──► registry.update(now, keys) ──► FrameReport
//!                   ▲
//! host input ──► set_input(keys)
//! ```
//!
//! Everything runs on the caller's thread. After [`FrameScheduler::shutdown`]
//! further pulses are ignored.

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::engine::events::FrameReport;
use crate::engine::input::{Key, KeySet};
use crate::engine::registry::EntityRegistry;
use crate::error::ConfigError;
use crate::Timestamp;

/// Pulse-driven driver for one scene.
#[derive(Debug)]
pub struct FrameScheduler {
    registry: EntityRegistry,
    keys: KeySet,
    debug_key: Key,
    debug: bool,
    running: bool,
}

impl FrameScheduler {
    /// Validate `config` and build a scheduler around an empty registry.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            width = config.field.width,
            height = config.field.height,
            time_step = ?config.time_step,
            "frame scheduler created"
        );
        Ok(Self {
            registry: EntityRegistry::new(config),
            keys: KeySet::new(),
            debug_key: config.debug_key,
            debug: config.debug_on_start,
            running: true,
        })
    }

    /// The scene's registry.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Mutable access for registering entities and spawners.
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    /// Merge entities registered during setup before the first pulse.
    pub fn activate(&mut self, now: Timestamp) -> FrameReport {
        let report = self.registry.initial_update(now);
        info!(live = report.stats.live_entities, "scene activated");
        report
    }

    /// Replace the pressed-key set seen by the next tick.
    ///
    /// A newly pressed debug key flips the debug toggle.
    pub fn set_input(&mut self, keys: KeySet) {
        if keys.newly_pressed(&self.keys, self.debug_key) {
            self.toggle_debug();
        }
        self.keys = keys;
    }

    /// Keys currently held.
    pub fn input(&self) -> &KeySet {
        &self.keys
    }

    /// Flip debug output and return the new state.
    pub fn toggle_debug(&mut self) -> bool {
        self.debug = !self.debug;
        info!(enabled = self.debug, "debug toggled");
        self.debug
    }

    /// Is per-frame debug output on?
    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    /// Run one frame for the pulse at `now`.
    ///
    /// Returns `None` once the scheduler has been shut down.
    pub fn tick(&mut self, now: Timestamp) -> Option<FrameReport> {
        if !self.running {
            return None;
        }

        let report = self.registry.update(now, &self.keys);

        if self.debug {
            let stats = &report.stats;
            debug!(
                frame = stats.frame,
                live = stats.live_entities,
                spawners = stats.spawners,
                spawned = stats.spawned,
                removed = stats.removed,
                faults = stats.faults,
                "frame"
            );
        }

        Some(report)
    }

    /// Stop reacting to pulses and tear down the scene.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.registry.clear();
        info!(frames = self.registry.frame(), "frame scheduler shut down");
    }

    /// False after [`FrameScheduler::shutdown`].
    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Position, Size};
    use crate::engine::entity::{Body, Capabilities, Entity};
    use crate::error::HookResult;

    const FRAME: u64 = 16_666_667;

    struct Counter {
        body: Body,
        updates: u32,
        last_keys: KeySet,
    }

    impl Counter {
        fn new() -> Self {
            Self {
                body: Body::new(Position::new(10.0, 10.0), Size::new(5.0, 5.0)),
                updates: 0,
                last_keys: KeySet::new(),
            }
        }
    }

    impl Entity for Counter {
        fn body(&self) -> &Body {
            &self.body
        }

        fn body_mut(&mut self) -> &mut Body {
            &mut self.body
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::INPUT_AWARE
        }

        fn update(&mut self, _now: Timestamp) -> HookResult {
            self.updates += 1;
            Ok(())
        }

        fn on_input(&mut self, keys: &KeySet) -> HookResult {
            self.last_keys = keys.clone();
            Ok(())
        }
    }

    fn scheduler() -> FrameScheduler {
        FrameScheduler::new(&EngineConfig::with_field(200.0, 200.0)).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = FrameScheduler::new(&EngineConfig::with_field(0.0, 100.0));
        assert!(matches!(result, Err(ConfigError::InvalidPlayField { .. })));
    }

    #[test]
    fn test_each_pulse_runs_one_update() {
        let mut scheduler = scheduler();
        let counter = scheduler.registry_mut().register_entity(Counter::new());

        for i in 0..5 {
            let report = scheduler.tick(i * FRAME).unwrap();
            assert_eq!(report.frame(), i + 1);
        }
        assert_eq!(counter.borrow().updates, 5);
        assert_eq!(scheduler.registry().frame(), 5);
    }

    #[test]
    fn test_activate_merges_setup_entities() {
        let mut scheduler = scheduler();
        let counter = scheduler.registry_mut().register_entity(Counter::new());

        let report = scheduler.activate(0);
        assert_eq!(report.stats.live_entities, 1);
        assert_eq!(counter.borrow().updates, 0);
    }

    #[test]
    fn test_input_sampled_at_next_tick() {
        let mut scheduler = scheduler();
        let counter = scheduler.registry_mut().register_entity(Counter::new());

        scheduler.set_input([Key::Right, Key::Space].into_iter().collect());
        scheduler.tick(0);
        assert!(counter.borrow().last_keys.contains(Key::Right));
        assert!(counter.borrow().last_keys.contains(Key::Space));

        scheduler.set_input(KeySet::new());
        scheduler.tick(FRAME);
        assert!(counter.borrow().last_keys.is_empty());
    }

    #[test]
    fn test_debug_key_toggles_on_press_edge() {
        let mut scheduler = scheduler();
        assert!(!scheduler.debug_enabled());

        let held: KeySet = [Key::F1].into_iter().collect();
        scheduler.set_input(held.clone());
        assert!(scheduler.debug_enabled());

        // Holding the key does not toggle again
        scheduler.set_input(held.clone());
        assert!(scheduler.debug_enabled());

        scheduler.set_input(KeySet::new());
        scheduler.set_input(held);
        assert!(!scheduler.debug_enabled());

        assert!(scheduler.toggle_debug());
    }

    #[test]
    fn test_debug_on_start() {
        let config = EngineConfig {
            debug_on_start: true,
            ..EngineConfig::default()
        };
        let scheduler = FrameScheduler::new(&config).unwrap();
        assert!(scheduler.debug_enabled());
    }

    #[test]
    fn test_shutdown_ignores_later_pulses() {
        let mut scheduler = scheduler();
        let counter = scheduler.registry_mut().register_entity(Counter::new());
        scheduler.tick(0);

        scheduler.shutdown();
        assert!(!scheduler.is_running());
        assert!(scheduler.registry().is_empty());
        assert!(scheduler.tick(FRAME).is_none());
        assert_eq!(counter.borrow().updates, 1);

        // Second shutdown is a no-op
        scheduler.shutdown();
    }
}
