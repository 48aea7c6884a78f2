//! Playable pitch catalog of a pinned instrument
//!
//! The catalog fixes the track-line order of every stave: entry 0 is the
//! first line drawn, entry N-1 the last. Instruments whose strip is fed the
//! other way round declare `reverse: true`; the reversal is applied once
//! here and never consulted again by callers.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("instrument has no playable pitches")]
    EmptyCatalog,

    #[error("pitch {0} is listed more than once")]
    DuplicatePitch(i32),

    #[error("minimum repeat distance must be positive, got {0}")]
    NonPositiveRepeatDistance(f64),

    /// Exact lookup miss. Only used internally; the mapper turns it into a snap.
    #[error("pitch {0} is not playable on this instrument")]
    NotFound(i32),
}

/// Ordered set of playable pitches plus the mechanical repeat constraint
#[derive(Debug, Clone)]
pub struct PitchCatalog {
    /// Pitches in track order (after any reversal)
    pitches: Vec<i32>,

    /// pitch -> track index
    positions: HashMap<i32, usize>,

    /// Track indices in the order the instrument profile declared them.
    /// `nearest_index` scans in this order.
    scan_order: Vec<usize>,

    /// Minimum physical distance (mm) between two punches on the same track
    min_repeat_distance: f64,
}

impl PitchCatalog {
    /// Build a catalog from the pitches as declared by the instrument profile
    pub fn new(declared: Vec<i32>, reverse: bool, min_repeat_distance: f64) -> Result<Self, CatalogError> {
        if declared.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        if !(min_repeat_distance > 0.0) {
            return Err(CatalogError::NonPositiveRepeatDistance(min_repeat_distance));
        }

        let len = declared.len();
        let mut pitches = declared;
        let scan_order: Vec<usize> = if reverse {
            pitches.reverse();
            (0..len).rev().collect()
        } else {
            (0..len).collect()
        };

        let mut positions = HashMap::with_capacity(len);
        for (index, &pitch) in pitches.iter().enumerate() {
            if positions.insert(pitch, index).is_some() {
                return Err(CatalogError::DuplicatePitch(pitch));
            }
        }

        Ok(Self {
            pitches,
            positions,
            scan_order,
            min_repeat_distance,
        })
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    /// Always false for a constructed catalog; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    /// Pitches in track order
    pub fn pitches(&self) -> &[i32] {
        &self.pitches
    }

    pub fn min_repeat_distance(&self) -> f64 {
        self.min_repeat_distance
    }

    pub fn contains(&self, pitch: i32) -> bool {
        self.positions.contains_key(&pitch)
    }

    /// Track index of an exactly playable pitch
    pub fn index_of(&self, pitch: i32) -> Result<usize, CatalogError> {
        self.positions
            .get(&pitch)
            .copied()
            .ok_or(CatalogError::NotFound(pitch))
    }

    /// Track index of the closest playable substitute for `pitch`
    ///
    /// Walks the pitches in declared order and stops at the first one that is
    /// not smaller than `pitch`. When every entry is smaller the last entry
    /// walked is used. For an ascending profile this rounds up, clamping at
    /// the top; a reversed profile is still walked in its declared order.
    pub fn nearest_index(&self, pitch: i32) -> usize {
        let mut last = self.scan_order[0];
        for &index in &self.scan_order {
            last = index;
            if pitch <= self.pitches[index] {
                break;
            }
        }
        last
    }
}
