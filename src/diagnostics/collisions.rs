//! Same-pitch repeat analysis
//!
//! A music box comb tooth needs time to settle after it is plucked, so two
//! punches on the same track must sit at least `min_repeat_distance` mm
//! apart. This pass finds the tightest same-pitch repeat in the performance
//! and compares it with the instrument's requirement.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Diagnostic;
use crate::models::NoteEvent;

/// Outcome of the repeat analysis
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RepeatAnalysis {
    /// No pitch occurs twice, so there is no minimum to check
    NoRepeats,

    /// Tightest same-pitch repeat, in physical units (mm)
    Minimum { distance: f64, required: f64 },
}

impl RepeatAnalysis {
    pub fn is_collision(&self) -> bool {
        match self {
            RepeatAnalysis::NoRepeats => false,
            RepeatAnalysis::Minimum { distance, required } => distance < required,
        }
    }

    /// Warning diagnostic when the tightest repeat is below the requirement
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match *self {
            RepeatAnalysis::Minimum { distance, required } if distance < required => Some(Diagnostic::warning(
                "note_collision",
                format!(
                    "SOME NOTES MAY NOT PLAY: {}mm note distance is less than {}mm required",
                    distance, required
                ),
            )),
            _ => None,
        }
    }
}

/// Find the minimum same-pitch repeat distance
///
/// # Arguments
/// * `events` - Transposed note events, in any order
/// * `divisor` - Ticks per millimetre
/// * `min_repeat_distance` - Instrument requirement in millimetres
pub fn analyze_repeats(events: &[NoteEvent], divisor: f64, min_repeat_distance: f64) -> RepeatAnalysis {
    let mut by_pitch: HashMap<i32, Vec<u64>> = HashMap::new();
    for event in events {
        by_pitch.entry(event.pitch).or_default().push(event.timestamp);
    }

    let mut minimum: Option<u64> = None;
    for timestamps in by_pitch.values_mut() {
        timestamps.sort_unstable();
        for pair in timestamps.windows(2) {
            let delta = pair[1] - pair[0];
            minimum = Some(minimum.map_or(delta, |m| m.min(delta)));
        }
    }

    match minimum {
        None => RepeatAnalysis::NoRepeats,
        Some(ticks) => {
            let distance = ticks as f64 / divisor;
            log::info!("MINIMUM NOTE DISTANCE: {}", distance);
            RepeatAnalysis::Minimum {
                distance,
                required: min_repeat_distance,
            }
        }
    }
}
