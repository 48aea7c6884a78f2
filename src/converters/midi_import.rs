//! Note extraction from Standard MIDI Files
//!
//! Every selected track is walked from tick 0, summing delta times into an
//! absolute tick clock. Each `NoteOn` with a non-zero velocity becomes one
//! `NoteEvent`; note-offs (including the velocity-0 note-on idiom) carry no
//! punch and are skipped. The result is stably sorted by time, so notes on
//! the same tick stay in track order.
//!
//! Uses the `midly` crate for parsing.

use std::path::{Path, PathBuf};

use midly::{MidiMessage, Smf, TrackEventKind};
use thiserror::Error;

use crate::config::defaults::DEFAULT_TRACK_COUNT;
use crate::models::note::{sort_by_time, NoteEvent};

#[derive(Debug, Error)]
pub enum MidiImportError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid MIDI file: {0}")]
    Parse(#[from] midly::Error),
}

pub type Result<T> = std::result::Result<T, MidiImportError>;

/// Which MIDI tracks contribute notes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackFilter {
    /// Track indices `0..n`
    FirstN(usize),
    /// An explicit list of track indices
    Only(Vec<usize>),
}

impl Default for TrackFilter {
    fn default() -> Self {
        TrackFilter::FirstN(DEFAULT_TRACK_COUNT)
    }
}

impl TrackFilter {
    pub fn includes(&self, track_index: usize) -> bool {
        match self {
            TrackFilter::FirstN(n) => track_index < *n,
            TrackFilter::Only(indices) => indices.contains(&track_index),
        }
    }
}

/// Read a MIDI file from disk and extract its note events
pub fn read_notes(path: &Path, tracks: &TrackFilter) -> Result<Vec<NoteEvent>> {
    let bytes = std::fs::read(path).map_err(|source| MidiImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extract_notes(&bytes, tracks)
}

/// Extract note events from SMF bytes
pub fn extract_notes(bytes: &[u8], tracks: &TrackFilter) -> Result<Vec<NoteEvent>> {
    let smf = Smf::parse(bytes)?;
    let mut notes = Vec::new();

    for (index, track) in smf.tracks.iter().enumerate() {
        if !tracks.includes(index) {
            continue;
        }

        let mut time: u64 = 0;
        let mut track_count = 0usize;
        for event in track {
            time += u64::from(event.delta.as_int());
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } = event.kind
            {
                if vel.as_int() == 0 {
                    continue;
                }
                notes.push(NoteEvent::new(i32::from(key.as_int()), time));
                track_count += 1;
            }
        }
        log::debug!("Track {}: {} note_on messages processed", index, track_count);
    }

    sort_by_time(&mut notes);
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use midly::num::{u15, u28, u4, u7};
    use midly::{Format, Header, MetaMessage, Timing, Track, TrackEvent};

    fn note_on(delta: u32, key: u8, vel: u8) -> TrackEvent<'static> {
        TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOn {
                    key: u7::new(key),
                    vel: u7::new(vel),
                },
            },
        }
    }

    fn note_off(delta: u32, key: u8) -> TrackEvent<'static> {
        TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOff {
                    key: u7::new(key),
                    vel: u7::new(0),
                },
            },
        }
    }

    fn end_of_track() -> TrackEvent<'static> {
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        }
    }

    fn smf_bytes(tracks: Vec<Track<'static>>) -> Vec<u8> {
        let smf = Smf {
            header: Header {
                format: Format::Parallel,
                timing: Timing::Metrical(u15::new(480)),
            },
            tracks,
        };
        let mut out = Vec::new();
        smf.write(&mut out).expect("Failed to write SMF");
        out
    }

    #[test]
    fn test_extract_accumulates_delta_times() {
        let bytes = smf_bytes(vec![vec![
            note_on(0, 60, 64),
            note_off(100, 60),
            note_on(20, 62, 64),
            note_off(100, 62),
            end_of_track(),
        ]]);

        let notes = extract_notes(&bytes, &TrackFilter::default()).unwrap();
        assert_eq!(notes, vec![NoteEvent::new(60, 0), NoteEvent::new(62, 120)]);
    }

    #[test]
    fn test_zero_velocity_note_on_is_skipped() {
        let bytes = smf_bytes(vec![vec![
            note_on(0, 60, 64),
            note_on(50, 60, 0),
            note_on(50, 64, 90),
            end_of_track(),
        ]]);

        let notes = extract_notes(&bytes, &TrackFilter::default()).unwrap();
        assert_eq!(notes, vec![NoteEvent::new(60, 0), NoteEvent::new(64, 100)]);
    }

    #[test]
    fn test_tracks_are_merged_in_time_order() {
        let bytes = smf_bytes(vec![
            vec![note_on(0, 72, 64), note_on(300, 74, 64), end_of_track()],
            vec![note_on(100, 48, 64), note_on(200, 50, 64), end_of_track()],
        ]);

        let notes = extract_notes(&bytes, &TrackFilter::default()).unwrap();
        let times: Vec<u64> = notes.iter().map(|n| n.timestamp).collect();
        assert_eq!(times, vec![0, 100, 300, 300]);
        // Same tick: track 0 came first during extraction
        assert_eq!(notes[2].pitch, 74);
        assert_eq!(notes[3].pitch, 50);
    }

    #[test]
    fn test_track_filter() {
        let bytes = smf_bytes(vec![
            vec![note_on(0, 72, 64), end_of_track()],
            vec![note_on(0, 48, 64), end_of_track()],
        ]);

        let only_second = extract_notes(&bytes, &TrackFilter::Only(vec![1])).unwrap();
        assert_eq!(only_second, vec![NoteEvent::new(48, 0)]);

        let first_only = extract_notes(&bytes, &TrackFilter::FirstN(1)).unwrap();
        assert_eq!(first_only, vec![NoteEvent::new(72, 0)]);
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let result = extract_notes(b"not a midi file", &TrackFilter::default());
        assert!(matches!(result, Err(MidiImportError::Parse(_))));
    }

    #[test]
    fn test_read_notes_missing_file() {
        let result = read_notes(Path::new("/nonexistent/song.mid"), &TrackFilter::default());
        assert!(matches!(result, Err(MidiImportError::Io { .. })));
    }
}
