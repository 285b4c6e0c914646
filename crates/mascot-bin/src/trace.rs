//! Scripted sensor and input traces replayed against a controller.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mascot_core::PresentationController;
use mascot_core::traits::MockClock;
use serde::{Deserialize, Serialize};

/// Simulated frame interval while replaying.
pub const STEP_MS: i64 = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceInput {
    Acceleration { x: f32, y: f32, z: f32 },
    MagneticField { x: f32, y: f32, z: f32 },
    Rotation { degrees: u32 },
    Touch,
    Play { animation: String },
    Stop,
    Theme { id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub at_ms: i64,
    #[serde(flatten)]
    pub input: TraceInput,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub events: Vec<TraceEvent>,
    /// Time to keep updating after the last event.
    #[serde(default)]
    pub tail_ms: i64,
}

impl Trace {
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace {}", path.display()))?;
        let mut trace: Trace = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse trace {}", path.display()))?;
        trace.events.sort_by_key(|e| e.at_ms);
        Ok(trace)
    }

    /// A short walk-through: pick the device up, stand it upright, shake it,
    /// lay it down and tap it.
    pub fn demo() -> Self {
        let g = mascot_core::sensor::rotation::STANDARD_GRAVITY;
        let at = |at_ms, input| TraceEvent { at_ms, input };
        Self {
            events: vec![
                at(0, TraceInput::MagneticField { x: 0.0, y: 22.0, z: -40.0 }),
                at(0, TraceInput::Acceleration { x: 0.0, y: 0.0, z: g }),
                at(500, TraceInput::Acceleration { x: 0.0, y: g, z: 0.0 }),
                at(1_500, TraceInput::Acceleration { x: 14.0, y: g, z: 0.0 }),
                at(3_000, TraceInput::Acceleration { x: 0.0, y: 0.0, z: g }),
                at(3_500, TraceInput::Touch),
            ],
            tail_ms: 2_000,
        }
    }
}

/// Replay `trace` on the simulated clock, updating the controller every
/// [`STEP_MS`]. Rejected inputs are logged and skipped.
pub fn replay(controller: &mut PresentationController, clock: &MockClock, trace: &Trace) {
    use mascot_core::traits::Clock;

    let start = clock.now_ms();
    let run_until = |controller: &mut PresentationController, until: i64| {
        while clock.now_ms() + STEP_MS <= until {
            clock.advance(STEP_MS);
            controller.update();
        }
    };

    for event in &trace.events {
        run_until(controller, start + event.at_ms);
        log::debug!("t={}ms {:?}", event.at_ms, event.input);
        apply(controller, &event.input);
    }
    let end = trace.events.last().map_or(0, |e| e.at_ms) + trace.tail_ms;
    run_until(controller, start + end);
}

fn apply(controller: &mut PresentationController, input: &TraceInput) {
    let result = match input {
        TraceInput::Acceleration { x, y, z } => {
            controller.on_acceleration_sample(*x, *y, *z);
            Ok(())
        }
        TraceInput::MagneticField { x, y, z } => {
            controller.on_magnetic_field_sample(*x, *y, *z);
            Ok(())
        }
        TraceInput::Rotation { degrees } => controller.on_screen_rotation(*degrees),
        TraceInput::Touch => {
            controller.on_touch();
            Ok(())
        }
        TraceInput::Play { animation } => controller.play_animation(animation),
        TraceInput::Stop => {
            controller.stop_animation();
            Ok(())
        }
        TraceInput::Theme { id } => {
            let result = controller.use_theme(id);
            controller.block_until_loaded();
            result
        }
    };
    if let Err(e) = result {
        log::warn!("Trace input {input:?} rejected: {e}");
    }
}
