//! Stave Layout Engine - packs mapped notes into staves and pages
//!
//! Time is wrapped into staves of `max_stave_length` mm and staves are
//! stacked onto pages, `staves_per_page` at a time. A single cursor walks
//! the time-ordered notes exactly once across the whole run: each stave
//! takes notes until one falls past its right edge, and that note is left
//! for the next stave.

use thiserror::Error;

use super::display_list::*;
use crate::config::LayoutConfig;
use crate::models::{note_name, MappedNote, PitchCatalog};

/// Radius of a punch dot (mm)
pub const NOTE_DOT_RADIUS: f64 = 1.0;

/// Gap between a pitch label and the start of its track line (mm)
const LABEL_INSET: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("page too small: {dimension} leaves {available}mm for staves")]
    PageTooSmall {
        dimension: &'static str,
        available: f64,
    },
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Layout engine for one instrument and one set of page parameters
pub struct StaveLayoutEngine<'a> {
    config: &'a LayoutConfig,
    catalog: &'a PitchCatalog,
}

impl<'a> StaveLayoutEngine<'a> {
    pub fn new(config: &'a LayoutConfig, catalog: &'a PitchCatalog) -> Self {
        Self { config, catalog }
    }

    /// Derive stave and page counts for a performance ending at `max_timestamp`
    pub fn geometry(&self, max_timestamp: u64) -> Result<StaveGeometry> {
        let config = self.config;

        let stave_width = (self.catalog.len() as f64 - 1.0) * config.pitch_spacing + config.margin;
        let staves_per_page = ((config.page_height - config.margin) / stave_width).floor();
        if !(staves_per_page >= 1.0) {
            return Err(LayoutError::PageTooSmall {
                dimension: "page height",
                available: staves_per_page,
            });
        }

        let max_stave_length = config.page_width - 2.0 * config.margin;
        if !(max_stave_length > 0.0) {
            return Err(LayoutError::PageTooSmall {
                dimension: "page width",
                available: max_stave_length,
            });
        }

        let max_length = max_timestamp as f64 / config.divisor;
        // The stave holding the latest note is the last one; a performance
        // with every note on tick 0 still gets a stave
        let total_staves = stave_for_time(max_length, max_stave_length) + 1;
        let staves_per_page = staves_per_page as usize;
        let total_pages = total_staves.div_ceil(staves_per_page);

        Ok(StaveGeometry {
            stave_width,
            staves_per_page,
            max_stave_length,
            max_length,
            total_staves,
            total_pages,
        })
    }

    /// Compute the complete display list for time-ordered mapped notes
    ///
    /// The staves cover the latest note, so every note is placed.
    pub fn layout(&self, notes: &[MappedNote]) -> Result<DisplayList> {
        let max_timestamp = notes.iter().map(|n| n.timestamp).max().unwrap_or(0);
        self.layout_until(notes, max_timestamp)
    }

    /// Lay out only the staves needed to reach `max_timestamp`
    ///
    /// Notes past the end of the last stave are not placed. Input must be
    /// sorted by time: a note earlier than the current stave is drawn on it
    /// with a negative relative time.
    pub fn layout_until(&self, notes: &[MappedNote], max_timestamp: u64) -> Result<DisplayList> {
        let geometry = self.geometry(max_timestamp)?;

        log::info!("MAX LENGTH: {}", geometry.max_length);
        log::info!("MAX STAVE LENGTH: {}", geometry.max_stave_length);
        log::info!("NO STAVES: {}", geometry.total_staves);
        log::info!("PAGES: {}", geometry.total_pages);

        let mut pages = Vec::with_capacity(geometry.total_pages);
        let mut cursor = 0usize;
        let mut stave_index = 0usize;

        for page_index in 0..geometry.total_pages {
            let mut staves = Vec::new();
            for slot in 0..geometry.staves_per_page {
                if stave_index >= geometry.total_staves {
                    break;
                }
                let mut stave = self.stave_frame(stave_index, slot, &geometry);
                cursor = self.fill_stave(&mut stave, notes, cursor, &geometry);
                staves.push(stave);
                stave_index += 1;
            }
            pages.push(Page {
                index: page_index,
                width: self.config.page_width,
                height: self.config.page_height,
                staves,
            });
        }

        if cursor < notes.len() {
            log::warn!("{} notes fall beyond the last stave and were not placed", notes.len() - cursor);
        }

        Ok(DisplayList { geometry, pages })
    }

    /// Top edge of the first track line for a stave slot
    fn line_offset(&self, slot: usize, geometry: &StaveGeometry) -> f64 {
        slot as f64 * geometry.stave_width + self.config.margin
    }

    /// Marks, title, track lines and labels; independent of the notes
    fn stave_frame(&self, stave_index: usize, slot: usize, geometry: &StaveGeometry) -> Stave {
        let config = self.config;
        let line_offset = self.line_offset(slot, geometry);
        let left = config.margin;
        let right = config.margin + geometry.max_stave_length;
        let top = line_offset - config.marker_offset_top;
        let bottom = line_offset + geometry.stave_width - config.margin + config.marker_offset_bottom;

        let mut instructions = Vec::with_capacity(5 + 2 * self.catalog.len());

        for (x, y) in [(right, top), (right, bottom), (left, top), (left, bottom)] {
            instructions.push(DrawInstruction::Cross {
                x,
                y,
                size: config.marker_size,
            });
        }

        instructions.push(DrawInstruction::Label {
            text: format!("STAVE {} - {}", stave_index, config.piece_name),
            x: config.margin * 2.0,
            y: line_offset + geometry.stave_width - config.margin + config.marker_offset,
            size: config.font_size,
            role: LabelRole::StaveTitle,
        });

        for (track_index, &pitch) in self.catalog.pitches().iter().enumerate() {
            let y = self.track_y(track_index, line_offset);
            instructions.push(DrawInstruction::TrackLine {
                track_index,
                x1: left,
                x2: right,
                y,
            });
            instructions.push(DrawInstruction::Label {
                text: note_name(pitch),
                x: config.margin - LABEL_INSET,
                y: y + config.font_size / 2.0,
                size: config.font_size,
                role: LabelRole::PitchName,
            });
        }

        Stave {
            index: stave_index,
            slot,
            offset_time: stave_index as f64 * geometry.max_stave_length,
            length: geometry.max_stave_length,
            instructions,
        }
    }

    /// Consume notes from `cursor` into the stave; returns the new cursor
    fn fill_stave(
        &self,
        stave: &mut Stave,
        notes: &[MappedNote],
        mut cursor: usize,
        geometry: &StaveGeometry,
    ) -> usize {
        let line_offset = self.line_offset(stave.slot, geometry);

        while let Some(note) = notes.get(cursor) {
            let time = note.physical_time(self.config.divisor);
            if stave_for_time(time, geometry.max_stave_length) > stave.index {
                // Belongs to a later stave; leave it under the cursor
                break;
            }
            let relative_time = time - stave.offset_time;
            stave.instructions.push(DrawInstruction::NoteDot {
                x: relative_time + self.config.margin,
                y: self.track_y(note.track_index, line_offset),
                radius: NOTE_DOT_RADIUS,
                track_index: note.track_index,
                relative_time,
                fill: if note.exact { NoteFill::Exact } else { NoteFill::Snapped },
            });
            cursor += 1;
        }

        cursor
    }

    fn track_y(&self, track_index: usize, line_offset: f64) -> f64 {
        track_index as f64 * self.config.pitch_spacing + line_offset
    }
}

/// Index of the stave whose window holds `time`
///
/// Windows are closed on the right, so a time exactly on a boundary belongs
/// to the earlier stave. Both the stave count and note placement go through
/// here so they can never disagree.
fn stave_for_time(time: f64, max_stave_length: f64) -> usize {
    if time <= 0.0 {
        return 0;
    }
    ((time / max_stave_length).ceil() as usize).saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Catalog of 3, spacing 2, margin 5: stave_width 9
    fn small_config(page_width: f64, page_height: f64) -> LayoutConfig {
        LayoutConfig {
            margin: 5.0,
            pitch_spacing: 2.0,
            marker_size: 1.0,
            marker_offset: 1.0,
            marker_offset_top: 1.0,
            marker_offset_bottom: 1.0,
            font_size: 1.0,
            divisor: 1.0,
            page_width,
            page_height,
            piece_name: "test".to_string(),
        }
    }

    fn three_tracks() -> PitchCatalog {
        PitchCatalog::new(vec![60, 62, 64], false, 1.0).unwrap()
    }

    fn note(track_index: usize, timestamp: u64) -> MappedNote {
        MappedNote {
            track_index,
            timestamp,
            exact: true,
        }
    }

    #[test]
    fn test_geometry_pagination_example() {
        let config = small_config(50.0, 20.0);
        let catalog = three_tracks();
        let geometry = StaveLayoutEngine::new(&config, &catalog).geometry(100).unwrap();
        assert_eq!(geometry.stave_width, 9.0);
        assert_eq!(geometry.staves_per_page, 1);
        assert_eq!(geometry.max_stave_length, 40.0);
        assert_eq!(geometry.total_staves, 3);
        assert_eq!(geometry.total_pages, 3);
    }

    #[test]
    fn test_page_too_short() {
        let config = small_config(50.0, 13.0); // (13 - 5) / 9 < 1
        let catalog = three_tracks();
        let err = StaveLayoutEngine::new(&config, &catalog).geometry(10).unwrap_err();
        assert!(matches!(err, LayoutError::PageTooSmall { dimension: "page height", .. }));
    }

    #[test]
    fn test_page_too_narrow() {
        let config = small_config(10.0, 100.0); // 10 - 2*5 = 0
        let catalog = three_tracks();
        let err = StaveLayoutEngine::new(&config, &catalog).geometry(10).unwrap_err();
        assert!(matches!(err, LayoutError::PageTooSmall { dimension: "page width", .. }));
    }

    #[test]
    fn test_zero_length_performance_gets_one_stave() {
        let config = small_config(50.0, 20.0);
        let catalog = three_tracks();
        let engine = StaveLayoutEngine::new(&config, &catalog);
        let list = engine.layout(&[note(0, 0), note(1, 0)]).unwrap();
        assert_eq!(list.geometry.total_staves, 1);
        assert_eq!(list.pages.len(), 1);
        assert_eq!(list.placed_notes(), 2);
    }

    #[test]
    fn test_stave_frame_contents() {
        let config = small_config(50.0, 20.0);
        let catalog = three_tracks();
        let list = StaveLayoutEngine::new(&config, &catalog).layout(&[note(0, 10)]).unwrap();
        let stave = &list.pages[0].staves[0];

        let crosses = stave
            .instructions
            .iter()
            .filter(|i| matches!(i, DrawInstruction::Cross { .. }))
            .count();
        let lines: Vec<f64> = stave
            .instructions
            .iter()
            .filter_map(|i| match i {
                DrawInstruction::TrackLine { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        let labels: Vec<&str> = stave
            .instructions
            .iter()
            .filter_map(|i| match i {
                DrawInstruction::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        assert_eq!(crosses, 4);
        assert_eq!(lines, vec![5.0, 7.0, 9.0]);
        assert_eq!(labels, vec!["STAVE 0 - test", "C3", "D3", "E3"]);
    }

    #[test]
    fn test_corner_marks_use_top_and_bottom_offsets() {
        let mut config = small_config(50.0, 20.0);
        config.marker_offset_top = 2.0;
        config.marker_offset_bottom = 3.0;
        let catalog = three_tracks();
        let list = StaveLayoutEngine::new(&config, &catalog).layout(&[note(0, 1)]).unwrap();
        let crosses: Vec<(f64, f64)> = list.pages[0].staves[0]
            .instructions
            .iter()
            .filter_map(|i| match i {
                DrawInstruction::Cross { x, y, .. } => Some((*x, *y)),
                _ => None,
            })
            .collect();
        // line_offset 5; top = 5 - 2; bottom = 5 + 9 - 5 + 3
        assert_eq!(crosses, vec![(45.0, 3.0), (45.0, 12.0), (5.0, 3.0), (5.0, 12.0)]);
    }

    #[test]
    fn test_notes_wrap_into_later_staves() {
        let config = small_config(50.0, 20.0);
        let catalog = three_tracks();
        let notes = [note(0, 0), note(1, 39), note(2, 41), note(0, 80), note(1, 100)];
        let list = StaveLayoutEngine::new(&config, &catalog).layout(&notes).unwrap();

        let counts: Vec<usize> = list.staves().map(|s| s.note_count()).collect();
        assert_eq!(counts, vec![2, 2, 1]);

        let third = &list.pages[2].staves[0];
        let dot = third.note_dots().next().unwrap();
        match dot {
            DrawInstruction::NoteDot {
                x, y, relative_time, ..
            } => {
                assert_eq!(*relative_time, 20.0);
                assert_eq!(*x, 25.0);
                assert_eq!(*y, 7.0);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_note_on_stave_edge_stays_on_earlier_stave() {
        let config = small_config(50.0, 20.0);
        let catalog = three_tracks();
        let notes = [note(0, 40), note(0, 41)];
        let list = StaveLayoutEngine::new(&config, &catalog).layout(&notes).unwrap();
        let counts: Vec<usize> = list.staves().map(|s| s.note_count()).collect();
        assert_eq!(counts, vec![1, 1]);
    }

    #[test]
    fn test_snapped_notes_are_marked() {
        let config = small_config(50.0, 20.0);
        let catalog = three_tracks();
        let notes = [
            note(0, 0),
            MappedNote {
                track_index: 1,
                timestamp: 5,
                exact: false,
            },
        ];
        let list = StaveLayoutEngine::new(&config, &catalog).layout(&notes).unwrap();
        let fills: Vec<NoteFill> = list.pages[0].staves[0]
            .note_dots()
            .filter_map(|i| match i {
                DrawInstruction::NoteDot { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![NoteFill::Exact, NoteFill::Snapped]);
    }

    #[test]
    fn test_staves_fill_pages_and_stop_at_required_count() {
        // Page height 40: floor(35 / 9) = 3 staves per page; 4 staves needed
        let config = small_config(50.0, 40.0);
        let catalog = three_tracks();
        let list = StaveLayoutEngine::new(&config, &catalog).layout(&[note(0, 150)]).unwrap();
        assert_eq!(list.geometry.total_staves, 4);
        assert_eq!(list.pages.len(), 2);
        assert_eq!(list.pages[0].staves.len(), 3);
        assert_eq!(list.pages[1].staves.len(), 1);
        assert_eq!(list.pages[1].staves[0].index, 3);
        assert_eq!(list.pages[1].staves[0].slot, 0);
        let slots: Vec<usize> = list.pages[0].staves.iter().map(|s| s.slot).collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }

    #[test]
    fn test_second_slot_is_offset_by_stave_width() {
        let config = small_config(50.0, 40.0);
        let catalog = three_tracks();
        let list = StaveLayoutEngine::new(&config, &catalog).layout(&[note(2, 60)]).unwrap();
        let dot = list.pages[0].staves[1].note_dots().next().unwrap();
        match dot {
            // slot 1: line_offset = 9 + 5; track 2 adds 4
            DrawInstruction::NoteDot { y, .. } => assert_eq!(*y, 18.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_fractional_stave_length_keeps_last_note() {
        // US Letter landscape: 279.4 - 2 * 20 leaves a stave length that is
        // not a whole number; 561_393 ticks / 67 = 8379mm sits on a boundary
        let config = LayoutConfig {
            page_width: 279.4,
            ..LayoutConfig::default()
        };
        let catalog = three_tracks();
        let notes = [note(0, 0), note(1, 561_393)];
        let list = StaveLayoutEngine::new(&config, &catalog).layout(&notes).unwrap();

        assert_eq!(list.placed_notes(), 2);
        let last = list.staves().last().unwrap();
        assert_eq!(last.index, list.geometry.total_staves - 1);
        assert_eq!(last.note_count(), 1);
    }

    #[test]
    fn test_unsorted_input_draws_late_note_with_negative_time() {
        let config = small_config(50.0, 20.0);
        let catalog = three_tracks();
        let list = StaveLayoutEngine::new(&config, &catalog)
            .layout(&[note(0, 100), note(0, 0)])
            .unwrap();

        assert_eq!(list.placed_notes(), 2);
        let counts: Vec<usize> = list.staves().map(|s| s.note_count()).collect();
        assert_eq!(counts, vec![0, 0, 2]);

        let dots: Vec<(f64, f64)> = list.pages[2].staves[0]
            .note_dots()
            .filter_map(|i| match i {
                DrawInstruction::NoteDot { x, relative_time, .. } => Some((*x, *relative_time)),
                _ => None,
            })
            .collect();
        assert_eq!(dots, vec![(25.0, 20.0), (-75.0, -80.0)]);
    }

    #[test]
    fn test_notes_past_the_window_are_not_placed() {
        let config = small_config(50.0, 20.0);
        let catalog = three_tracks();
        let notes: Vec<MappedNote> = (0..=10).map(|i| note(0, i * 10)).collect();
        let list = StaveLayoutEngine::new(&config, &catalog)
            .layout_until(&notes, 50)
            .unwrap();

        // 50mm needs two 40mm staves, which end at 80
        assert_eq!(list.geometry.total_staves, 2);
        let window_end = list.geometry.total_staves as f64 * list.geometry.max_stave_length;
        let inside = notes.iter().filter(|n| n.timestamp as f64 <= window_end).count();
        assert_eq!(inside, 9);
        assert_eq!(list.placed_notes(), inside);
    }

    #[test]
    fn test_stave_for_time_boundaries() {
        assert_eq!(stave_for_time(0.0, 40.0), 0);
        assert_eq!(stave_for_time(0.5, 40.0), 0);
        assert_eq!(stave_for_time(40.0, 40.0), 0);
        assert_eq!(stave_for_time(40.5, 40.0), 1);
        assert_eq!(stave_for_time(80.0, 40.0), 1);
    }
}
