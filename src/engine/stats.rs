//! Frame Statistics
//!
//! Counters the registry publishes after every frame. An observer is
//! optional; with none attached the registry simply skips publishing.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Per-frame counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    /// Frame number (1-based, 0 for the initial update)
    pub frame: u64,
    /// Live entities after the purge
    pub live_entities: usize,
    /// Active spawners
    pub spawners: usize,
    /// Entities merged into the live set this frame
    pub spawned: usize,
    /// Entities purged this frame
    pub removed: usize,
    /// Failed entity hooks this frame
    pub faults: usize,
}

/// Receives statistics after each frame.
pub trait StatisticsObserver {
    /// Called once at the end of every update.
    fn on_frame(&mut self, stats: &FrameStats);
}

impl<F> StatisticsObserver for F
where
    F: FnMut(&FrameStats),
{
    fn on_frame(&mut self, stats: &FrameStats) {
        self(stats)
    }
}

/// Observer that keeps the most recent snapshot, readable through any clone.
#[derive(Clone, Debug, Default)]
pub struct SharedStats {
    latest: Rc<Cell<FrameStats>>,
}

impl SharedStats {
    /// Empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last published statistics.
    pub fn latest(&self) -> FrameStats {
        self.latest.get()
    }
}

impl StatisticsObserver for SharedStats {
    fn on_frame(&mut self, stats: &FrameStats) {
        self.latest.set(*stats);
    }
}
