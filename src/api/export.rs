//! Punch sheet export
//!
//! The batch pipeline: transposition search, repeat analysis, pitch mapping,
//! stave layout, then rendering. `plan_punch_sheets` does everything that
//! can fail before touching the filesystem, so a fatal error never leaves
//! partial output behind; `export_punch_sheets` adds MIDI import and file
//! writing on top.

use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::config::{LayoutConfig, Settings};
use crate::converters::read_notes;
use crate::diagnostics::collisions::{analyze_repeats, RepeatAnalysis};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::Result;
use crate::models::note::sort_by_time;
use crate::models::{NoteEvent, PitchCatalog};
use crate::renderers::{write_pages, DisplayList, Renderer, StaveLayoutEngine, StaveGeometry};
use crate::transposition::{find_best_transposition, PitchMapper, SearchOutcome, TranspositionResult};

/// Everything computed for a run before any output is written
#[derive(Debug, Clone)]
pub struct PunchPlan {
    pub search: SearchOutcome,
    pub repeat_analysis: RepeatAnalysis,
    pub diagnostics: Diagnostics,
    /// Notes that were not exactly playable and got snapped
    pub snapped_notes: usize,
    pub total_notes: usize,
    pub display_list: DisplayList,
}

/// Summary of a completed export
#[derive(Debug, Clone)]
pub struct RunReport {
    pub transposition: TranspositionResult,
    pub repeat_analysis: RepeatAnalysis,
    pub diagnostics: Diagnostics,
    pub geometry: StaveGeometry,
    pub total_notes: usize,
    pub placed_notes: usize,
    pub snapped_notes: usize,
    pub written: Vec<PathBuf>,
}

/// Compute the complete layout for a performance
///
/// # Arguments
/// * `events` - Extracted note events in any order
/// * `catalog` - Target instrument
/// * `config` - Page and stave geometry
/// * `transpose_range` - Candidate shifts, lower inclusive, upper exclusive
pub fn plan_punch_sheets(
    events: &[NoteEvent],
    catalog: &PitchCatalog,
    config: &LayoutConfig,
    transpose_range: Range<i32>,
) -> Result<PunchPlan> {
    let search = find_best_transposition(events, catalog, transpose_range)?;
    let best = search.best;
    let mut diagnostics = Diagnostics::new();

    let transposed: Vec<NoteEvent> = events.iter().map(|e| e.transposed(best.shift)).collect();
    let repeat_analysis = analyze_repeats(&transposed, config.divisor, catalog.min_repeat_distance());
    if let Some(diagnostic) = repeat_analysis.to_diagnostic() {
        diagnostics.add(diagnostic);
    }

    log::info!("TRANSPOSE: {}", best.shift);
    log::info!("PERCENTAGE HIT: {}%", best.percentage());

    // The mapper applies the shift itself
    let mut ordered = events.to_vec();
    sort_by_time(&mut ordered);
    let mapped = PitchMapper::new(catalog, best.shift).map_all(&ordered);

    let snapped_notes = mapped.iter().filter(|m| !m.exact).count();
    if snapped_notes > 0 {
        diagnostics.add(Diagnostic::info(
            "snapped_notes",
            format!("{} of {} notes snapped to the nearest playable pitch", snapped_notes, mapped.len()),
        ));
    }

    let display_list = StaveLayoutEngine::new(config, catalog).layout(&mapped)?;

    if !best.is_perfect() {
        diagnostics.add(Diagnostic::warning(
            "imperfect_transposition",
            format!("PERFECT TRANSPOSITION NOT FOUND! {}% of notes playable", best.percentage()),
        ));
    }

    Ok(PunchPlan {
        search,
        repeat_analysis,
        diagnostics,
        snapped_notes,
        total_notes: mapped.len(),
        display_list,
    })
}

/// Run the full batch described by `settings`
pub fn export_punch_sheets(settings: &Settings, renderer: &dyn Renderer) -> Result<RunReport> {
    log::info!("Reading {}", settings.input.display());
    let events = read_notes(&settings.input, &settings.tracks)?;

    let plan = plan_punch_sheets(
        &events,
        &settings.catalog,
        &settings.layout,
        settings.transpose_range.clone(),
    )?;

    let written = write_pages(renderer, &plan.display_list.pages, &settings.output_prefix)?;

    if let Some(path) = &settings.dump_plan {
        write_display_list_json(&plan.display_list, path)?;
    }

    Ok(RunReport {
        transposition: plan.search.best,
        repeat_analysis: plan.repeat_analysis,
        geometry: plan.display_list.geometry,
        placed_notes: plan.display_list.placed_notes(),
        total_notes: plan.total_notes,
        snapped_notes: plan.snapped_notes,
        diagnostics: plan.diagnostics,
        written,
    })
}

/// Write the display list as pretty-printed JSON
pub fn write_display_list_json(display_list: &DisplayList, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(display_list)?;
    std::fs::write(path, json)?;
    log::info!("Display list written to {}", path.display());
    Ok(())
}
