//! Transposition search
//!
//! Tries every semitone shift in a half-open range and keeps the one under
//! which the largest share of the performance lands on playable pitches.
//! Ties go to the shift seen first (ascending order); a shift that makes
//! every note playable ends the search on the spot.

use std::collections::BTreeMap;
use std::ops::Range;

use num_rational::Ratio;

use super::{Result, TranspositionError};
use crate::models::{note_name, NoteEvent, PitchCatalog};

/// Fraction of notes playable under a shift, kept exact
pub type Coverage = Ratio<usize>;

/// The chosen shift and how much of the performance it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranspositionResult {
    pub shift: i32,
    pub coverage: Coverage,
}

impl TranspositionResult {
    pub fn is_perfect(&self) -> bool {
        self.coverage == Ratio::from_integer(1)
    }

    /// Coverage as a percentage, for reporting
    pub fn percentage(&self) -> f64 {
        *self.coverage.numer() as f64 / *self.coverage.denom() as f64 * 100.0
    }
}

/// One entry of the improvement trace: a shift that beat every earlier shift
#[derive(Debug, Clone, PartialEq)]
pub struct TranspositionCandidate {
    pub shift: i32,
    pub coverage: Coverage,
    pub total_notes: usize,
    pub playable_notes: usize,
    /// Source pitch names that stay unplayable under this shift, with counts
    pub missing: BTreeMap<String, usize>,
}

impl TranspositionCandidate {
    pub fn missing_notes(&self) -> usize {
        self.total_notes - self.playable_notes
    }
}

/// Best result plus the trace of improving candidates, in search order
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: TranspositionResult,
    pub trace: Vec<TranspositionCandidate>,
}

/// Find the shift in `range` that maximizes playable coverage
///
/// # Arguments
/// * `events` - Extracted note events (read once, never re-decoded)
/// * `catalog` - Target instrument
/// * `range` - Candidate shifts, lower inclusive, upper exclusive
///
/// # Returns
/// The best shift and the improvement trace. Fails with `NoData` when there
/// are no events and `EmptyRange` when the range holds no shift.
pub fn find_best_transposition(
    events: &[NoteEvent],
    catalog: &PitchCatalog,
    range: Range<i32>,
) -> Result<SearchOutcome> {
    if events.is_empty() {
        return Err(TranspositionError::NoData);
    }
    if range.is_empty() {
        return Err(TranspositionError::EmptyRange {
            lower: range.start,
            upper: range.end,
        });
    }

    // Tally once; each candidate then costs O(distinct pitches)
    let total = events.len();
    let mut frequencies: BTreeMap<i32, usize> = BTreeMap::new();
    for event in events {
        *frequencies.entry(event.pitch).or_insert(0) += 1;
    }

    let mut best: Option<TranspositionResult> = None;
    let mut trace = Vec::new();

    for shift in range {
        let playable: usize = frequencies
            .iter()
            .filter(|(&pitch, _)| playable(catalog, pitch, shift))
            .map(|(_, &count)| count)
            .sum();
        let coverage = Ratio::new(playable, total);

        if best.is_some_and(|b| coverage <= b.coverage) {
            continue;
        }

        let candidate = TranspositionCandidate {
            shift,
            coverage,
            total_notes: total,
            playable_notes: playable,
            missing: missing_names(&frequencies, catalog, shift),
        };
        log_candidate(&candidate);
        trace.push(candidate);

        let result = TranspositionResult { shift, coverage };
        best = Some(result);

        if result.is_perfect() {
            log::info!("Perfect transposition found at shift {}", shift);
            break;
        }
    }

    // The range was non-empty, so the first shift always lands in `best`
    let best = best.ok_or(TranspositionError::NoData)?;
    Ok(SearchOutcome { best, trace })
}

/// Names of source pitches that are unplayable under `shift`, with counts
fn missing_names(
    frequencies: &BTreeMap<i32, usize>,
    catalog: &PitchCatalog,
    shift: i32,
) -> BTreeMap<String, usize> {
    let mut missing = BTreeMap::new();
    for (&pitch, &count) in frequencies {
        if !playable(catalog, pitch, shift) {
            *missing.entry(note_name(pitch)).or_insert(0) += count;
        }
    }
    missing
}

/// Shifts that overflow the pitch range never land on the instrument
fn playable(catalog: &PitchCatalog, pitch: i32, shift: i32) -> bool {
    pitch.checked_add(shift).is_some_and(|p| catalog.contains(p))
}

fn log_candidate(candidate: &TranspositionCandidate) {
    log::debug!("Transposition Candidate Report");
    log::debug!("Transposition: {}", candidate.shift);
    log::debug!("Total Notes: {}", candidate.total_notes);
    log::debug!("Notes OK: {}", candidate.playable_notes);
    log::debug!("Distinct Notes Missing: {}", candidate.missing.len());
    log::debug!("Total Notes Missing: {}", candidate.missing_notes());
    log::debug!("Unavailables: {:?}", candidate.missing);
}
