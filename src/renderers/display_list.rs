//! Display List for punch sheet rendering
//!
//! This module defines the output of the stave layout engine. The DisplayList
//! holds every pre-calculated position a renderer needs (marks, track lines,
//! labels, note dots) so renderers never do layout arithmetic of their own.
//! All coordinates are millimetres from the top-left page corner; x runs
//! along time, y across the strip.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Top-level display list: the derived geometry plus every page
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DisplayList {
    pub geometry: StaveGeometry,
    pub pages: Vec<Page>,
}

impl DisplayList {
    /// Iterate every stave of every page in emission order
    pub fn staves(&self) -> impl Iterator<Item = &Stave> {
        self.pages.iter().flat_map(|p| p.staves.iter())
    }

    /// Number of note dots placed across all pages
    pub fn placed_notes(&self) -> usize {
        self.staves().map(|s| s.note_count()).sum()
    }
}

/// Constants derived from the page, the instrument and the performance
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct StaveGeometry {
    /// Extent of one stave across the strip, including its margin
    pub stave_width: f64,
    pub staves_per_page: usize,
    /// Time covered by one stave, in mm of strip
    pub max_stave_length: f64,
    /// Latest note time in mm of strip
    pub max_length: f64,
    pub total_staves: usize,
    pub total_pages: usize,
}

/// One output page
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Page {
    /// Zero-based page number, used in the output file name
    pub index: usize,
    pub width: f64,
    pub height: f64,
    pub staves: Vec<Stave>,
}

impl Page {
    pub fn note_count(&self) -> usize {
        self.staves.iter().map(|s| s.note_count()).sum()
    }
}

/// One stave: a fixed time window drawn as a set of track lines
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Stave {
    /// Global stave number across all pages
    pub index: usize,
    /// Position on its page (0 = top)
    pub slot: usize,
    /// Start of the time window (mm of strip)
    pub offset_time: f64,
    /// Length of the time window (mm of strip)
    pub length: f64,
    pub instructions: Vec<DrawInstruction>,
}

impl Stave {
    /// Half-open time window `[offset_time, offset_time + length)`
    pub fn window(&self) -> Range<f64> {
        self.offset_time..self.offset_time + self.length
    }

    pub fn note_dots(&self) -> impl Iterator<Item = &DrawInstruction> {
        self.instructions
            .iter()
            .filter(|i| matches!(i, DrawInstruction::NoteDot { .. }))
    }

    pub fn note_count(&self) -> usize {
        self.note_dots().count()
    }
}

/// Fill of a note dot: exact pitch, or snapped to a neighbouring track
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoteFill {
    Exact,
    Snapped,
}

/// What a text label is for
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LabelRole {
    /// Pitch name at the start of a track line
    PitchName,
    /// "STAVE n - piece" caption under the stave
    StaveTitle,
}

/// A single renderer-agnostic drawing step
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawInstruction {
    /// Cut/alignment marker cross centred on (x, y)
    Cross { x: f64, y: f64, size: f64 },

    /// Horizontal track line for one playable pitch
    TrackLine {
        track_index: usize,
        x1: f64,
        x2: f64,
        y: f64,
    },

    /// Text anchored at its baseline start
    Label {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        role: LabelRole,
    },

    /// A punch position
    NoteDot {
        x: f64,
        y: f64,
        radius: f64,
        track_index: usize,
        /// Time relative to the stave window start (mm)
        relative_time: f64,
        fill: NoteFill,
    },
}
