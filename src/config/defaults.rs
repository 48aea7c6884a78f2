//! Default values for punch sheet generation
//!
//! Used whenever neither the YAML file nor the command line sets a value.
//! Lengths are millimetres.

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "punchbox.yaml";

/// Output file prefix; pages are written as `{prefix}{index}.svg`
pub const DEFAULT_OUTPUT_PREFIX: &str = "output";

/// Name of the built-in profile used when the YAML declares no `boxen`
pub const DEFAULT_MUSICBOX: &str = "default";

/// Common offset of the cut markers from the stave edge
pub const DEFAULT_MARKER_OFFSET: f64 = 6.0;

/// Size of the cut marker crosses
pub const DEFAULT_MARKER_SIZE: f64 = 5.0;

/// Gap around and between staves
pub const DEFAULT_MARGIN: f64 = 20.0;

pub const DEFAULT_FONT_SIZE: f64 = 1.0;

/// Ticks per millimetre; larger values compress time (faster tempo on the strip)
pub const DEFAULT_DIVISOR: f64 = 67.0;

/// Transposition search bounds, lower inclusive, upper exclusive
pub const DEFAULT_TRANSPOSE_LOWER: i32 = -100;
pub const DEFAULT_TRANSPOSE_UPPER: i32 = 100;

/// A4 landscape
pub const DEFAULT_PAGE_WIDTH: f64 = 297.0;
pub const DEFAULT_PAGE_HEIGHT: f64 = 210.0;

/// MIDI tracks read when no explicit selection is given
pub const DEFAULT_TRACK_COUNT: usize = 16;

/// Profile defaults: a one-octave chromatic box from middle C
pub const DEFAULT_NOTE_DATA: [i32; 13] = [60, 61, 62, 63, 64, 65, 66, 67, 68, 69, 70, 71, 72];
pub const DEFAULT_PITCH_SPACING: f64 = 2.0;
pub const DEFAULT_NOTE_COLLISION: f64 = 5.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_is_not_empty() {
        assert!(DEFAULT_TRANSPOSE_LOWER < DEFAULT_TRANSPOSE_UPPER);
    }

    #[test]
    fn test_default_page_fits_default_box() {
        // 12 gaps of 2mm plus margin must fit at least once on the page
        let stave_width = (DEFAULT_NOTE_DATA.len() - 1) as f64 * DEFAULT_PITCH_SPACING + DEFAULT_MARGIN;
        assert!((DEFAULT_PAGE_HEIGHT - DEFAULT_MARGIN) / stave_width >= 1.0);
        assert!(DEFAULT_PAGE_WIDTH - 2.0 * DEFAULT_MARGIN > 0.0);
    }
}
