//! Reef Demo
//!
//! Headless driver for the reef scene. Feeds a synthetic 60 Hz pulse and a
//! scripted key sequence into the scheduler, logs what happens and prints
//! the final score as JSON.
//!
//! Usage: `reef-demo [config.json]`

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use reef::{
    demo::{self, ReefConfig},
    engine::{FrameStats, Key, KeySet},
    EngineConfig, FrameScheduler, PULSE_RATE, VERSION,
};

/// Length of the demo run in seconds.
const DEMO_SECONDS: u64 = 30;

/// Seed for the spawners.
const DEMO_SEED: u64 = 12345;

const NANOS_PER_PULSE: u64 = 1_000_000_000 / PULSE_RATE as u64;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Reef Demo v{}", VERSION);
    info!("Pulse Rate: {} Hz", PULSE_RATE);

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(&path).with_context(|| format!("loading config from {path}"))?,
        None => EngineConfig::default(),
    };

    demo_reef(&config)
}

/// Scripted keys for pulse `t`: swim in a square, pausing between legs.
fn scripted_keys(t: u64) -> KeySet {
    let leg = (t / (2 * PULSE_RATE as u64)) % 5;
    let key = match leg {
        0 => Some(Key::Left),
        1 => Some(Key::Up),
        2 => Some(Key::Right),
        3 => Some(Key::Down),
        _ => None,
    };
    let mut keys: KeySet = key.into_iter().collect();
    // Tap the debug key for one pulse at the ten second mark
    if t == 10 * PULSE_RATE as u64 {
        keys.press(Key::F1);
    }
    keys
}

fn demo_reef(config: &EngineConfig) -> Result<()> {
    info!("=== Starting Reef Demo ===");

    let mut scheduler = FrameScheduler::new(config).context("invalid engine config")?;
    let reef = demo::populate(&mut scheduler, &ReefConfig::default(), DEMO_SEED, 0)
        .context("invalid reef config")?;
    scheduler.activate(0);

    let total_pulses = DEMO_SECONDS * PULSE_RATE as u64;
    let mut last = FrameStats::default();
    let mut total_events = 0;
    let mut total_faults = 0;

    info!("Running {} pulses...", total_pulses);

    for t in 0..total_pulses {
        scheduler.set_input(scripted_keys(t));
        let Some(report) = scheduler.tick(t * NANOS_PER_PULSE) else {
            break;
        };
        total_events += report.events.len();
        last = report.stats;

        // Faults are logged where they happen
        total_faults += report.stats.faults;

        // Report every 5 seconds
        if t % (5 * PULSE_RATE as u64) == 0 {
            let board = *reef.scoreboard.borrow();
            info!(
                "Pulse {}: {} live, health {}, {} bubbles popped",
                t, last.live_entities, board.health, board.popped
            );
        }

        if reef.scoreboard.borrow().diver_lost {
            info!("Diver lost at pulse {}", t);
            break;
        }
    }

    scheduler.shutdown();

    info!("=== Reef Results ===");
    info!("Total events: {}", total_events);
    info!("Hook faults: {}", total_faults);

    let board = *reef.scoreboard.borrow();
    let summary = serde_json::json!({
        "scoreboard": board,
        "last_frame": last,
    });
    println!("{}", serde_json::to_string_pretty(&summary).context("serializing results")?);

    Ok(())
}
