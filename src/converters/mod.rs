//! Converters from source performance formats into note events
//!
//! Currently Standard MIDI Files only.

pub mod midi_import;

pub use midi_import::{extract_notes, read_notes, MidiImportError, TrackFilter};
