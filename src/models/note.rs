//! Note events as extracted from a performance, and their track placements
//!
//! A `NoteEvent` is what the MIDI importer produces: a pitch and an absolute
//! tick timestamp. A `MappedNote` is the same event after it has been
//! transposed and assigned to a track line of the target instrument.

use serde::{Deserialize, Serialize};

/// A single struck note: MIDI-style pitch number at an absolute tick time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: i32,
    pub timestamp: u64,
}

impl NoteEvent {
    pub fn new(pitch: i32, timestamp: u64) -> Self {
        Self { pitch, timestamp }
    }

    /// The same event moved by `shift` semitones, saturating at the pitch range
    pub fn transposed(&self, shift: i32) -> Self {
        Self {
            pitch: self.pitch.saturating_add(shift),
            timestamp: self.timestamp,
        }
    }

    /// Timestamp converted to physical length (mm) using the time divisor
    pub fn physical_time(&self, divisor: f64) -> f64 {
        self.timestamp as f64 / divisor
    }
}

/// A note placed on a concrete track line of the instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedNote {
    /// Index of the track line (0 = first line of the stave)
    pub track_index: usize,
    pub timestamp: u64,
    /// False when the pitch was not playable and got snapped to a neighbour
    pub exact: bool,
}

impl MappedNote {
    pub fn physical_time(&self, divisor: f64) -> f64 {
        self.timestamp as f64 / divisor
    }
}

/// Stable sort by timestamp; events sharing a tick keep their extraction order
pub fn sort_by_time(events: &mut [NoteEvent]) {
    events.sort_by_key(|e| e.timestamp);
}

/// Latest timestamp in the sequence (0 for an empty slice)
pub fn max_timestamp(events: &[NoteEvent]) -> u64 {
    events.iter().map(|e| e.timestamp).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_is_stable_for_equal_timestamps() {
        let mut events = vec![
            NoteEvent::new(64, 10),
            NoteEvent::new(60, 0),
            NoteEvent::new(67, 10),
            NoteEvent::new(62, 10),
        ];
        sort_by_time(&mut events);

        let pitches: Vec<i32> = events.iter().map(|e| e.pitch).collect();
        assert_eq!(pitches, vec![60, 64, 67, 62]);
    }

    #[test]
    fn test_transposed_keeps_timestamp() {
        let e = NoteEvent::new(60, 480).transposed(-3);
        assert_eq!(e.pitch, 57);
        assert_eq!(e.timestamp, 480);
    }

    #[test]
    fn test_physical_time() {
        let e = NoteEvent::new(60, 134);
        assert_eq!(e.physical_time(67.0), 2.0);
    }

    #[test]
    fn test_max_timestamp() {
        assert_eq!(max_timestamp(&[]), 0);
        let events = [NoteEvent::new(60, 5), NoteEvent::new(61, 99), NoteEvent::new(62, 7)];
        assert_eq!(max_timestamp(&events), 99);
    }

    #[test]
    fn test_transposed_saturates() {
        assert_eq!(NoteEvent::new(60, 3).transposed(i32::MAX).pitch, i32::MAX);
        assert_eq!(NoteEvent::new(-60, 3).transposed(i32::MIN).pitch, i32::MIN);
    }
}
