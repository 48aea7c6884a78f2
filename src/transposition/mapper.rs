//! Pitch to track mapping
//!
//! Every transposed note gets a track line. Playable pitches go to their own
//! line; anything else snaps to the nearest playable pitch and is flagged so
//! the renderer can mark it. Notes are never dropped here.

use crate::models::{MappedNote, NoteEvent, PitchCatalog};

/// Maps transposed notes onto the track lines of one instrument
pub struct PitchMapper<'a> {
    catalog: &'a PitchCatalog,
    shift: i32,
}

impl<'a> PitchMapper<'a> {
    pub fn new(catalog: &'a PitchCatalog, shift: i32) -> Self {
        Self { catalog, shift }
    }

    /// Place one source event (the shift is applied here)
    pub fn map(&self, event: &NoteEvent) -> MappedNote {
        let (track_index, exact) = match event.pitch.checked_add(self.shift) {
            Some(pitch) => match self.catalog.index_of(pitch) {
                Ok(index) => (index, true),
                Err(_) => (self.catalog.nearest_index(pitch), false),
            },
            // Out of the pitch range entirely: clamp to the nearest end
            None => (self.catalog.nearest_index(event.pitch.saturating_add(self.shift)), false),
        };
        MappedNote {
            track_index,
            timestamp: event.timestamp,
            exact,
        }
    }

    /// Place a whole time-ordered sequence, preserving order
    pub fn map_all(&self, events: &[NoteEvent]) -> Vec<MappedNote> {
        events.iter().map(|e| self.map(e)).collect()
    }
}
