//! Configuration for punch sheet runs
//!
//! Values come from three layers, highest priority first: command-line
//! overrides, the YAML file, and the constants in `defaults`. `resolve`
//! folds them into one immutable `Settings` value that is passed explicitly
//! to every stage; there is no process-wide configuration.

pub mod defaults;
pub mod file;

pub use file::{ConfigFile, MusicBoxProfile, PageSize, TransposeBounds};

use std::ops::Range;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::converters::midi_import::TrackFilter;
use crate::models::{CatalogError, PitchCatalog};
use defaults::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown music box '{name}' (available: {available:?})")]
    UnknownMusicBox { name: String, available: Vec<String> },

    #[error("several music boxes are configured, pick one with --musicbox (available: {available:?})")]
    NoMusicBox { available: Vec<String> },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("no input file given")]
    MissingInput,

    #[error("invalid music box: {0}")]
    Catalog(#[from] CatalogError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Geometry and labelling parameters for the stave layout (mm)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Gap around the page edge and between staves
    pub margin: f64,

    /// Distance between neighbouring track lines
    pub pitch_spacing: f64,

    /// Size of the cut marker crosses
    pub marker_size: f64,

    /// Common marker offset; also places the stave title
    pub marker_offset: f64,

    /// Marker offset above the first track line
    pub marker_offset_top: f64,

    /// Marker offset below the last track line
    pub marker_offset_bottom: f64,

    pub font_size: f64,

    /// Ticks per millimetre
    pub divisor: f64,

    pub page_width: f64,
    pub page_height: f64,

    /// Printed in every stave title
    pub piece_name: String,
}

impl LayoutConfig {
    /// Reject non-positive or non-finite numeric parameters
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("margin", self.margin),
            ("pitch spacing", self.pitch_spacing),
            ("marker size", self.marker_size),
            ("font size", self.font_size),
            ("divisor", self.divisor),
            ("page width", self.page_width),
            ("page height", self.page_height),
        ];
        for (field, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            pitch_spacing: DEFAULT_PITCH_SPACING,
            marker_size: DEFAULT_MARKER_SIZE,
            marker_offset: DEFAULT_MARKER_OFFSET,
            marker_offset_top: DEFAULT_MARKER_OFFSET,
            marker_offset_bottom: DEFAULT_MARKER_OFFSET,
            font_size: DEFAULT_FONT_SIZE,
            divisor: DEFAULT_DIVISOR,
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
            piece_name: String::new(),
        }
    }
}

/// Values given on the command line; `None` means "not given"
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub filename: Option<String>,
    pub output: Option<String>,
    pub name: Option<String>,
    pub musicbox: Option<String>,
    pub marker_offset: Option<f64>,
    pub marker_offset_top: Option<f64>,
    pub marker_offset_bottom: Option<f64>,
    pub marker_size: Option<f64>,
    pub margin: Option<f64>,
    pub font_size: Option<f64>,
    pub divisor: Option<f64>,
    pub transpose_lower: Option<i32>,
    pub transpose_upper: Option<i32>,
    pub page_width: Option<f64>,
    pub page_height: Option<f64>,
    pub tracks: Option<Vec<usize>>,
    pub dump_plan: Option<PathBuf>,
    pub debug: bool,
}

/// Everything a run needs, fully resolved
#[derive(Clone, Debug)]
pub struct Settings {
    pub input: PathBuf,
    pub output_prefix: String,
    pub musicbox: String,
    pub catalog: PitchCatalog,
    pub layout: LayoutConfig,
    pub transpose_range: Range<i32>,
    pub tracks: TrackFilter,
    pub dump_plan: Option<PathBuf>,
}

/// Load the configuration file named by the overrides (or the default file
/// when present) and resolve it against the overrides
pub fn load_settings(overrides: &Overrides) -> Result<Settings> {
    let file = match &overrides.config_path {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::load_or_default(std::path::Path::new(DEFAULT_CONFIG_FILE))?,
    };
    resolve(&file, overrides)
}

/// Merge command-line overrides, file values and defaults
pub fn resolve(file: &ConfigFile, overrides: &Overrides) -> Result<Settings> {
    let input = overrides
        .filename
        .clone()
        .or_else(|| file.filename.clone())
        .ok_or(ConfigError::MissingInput)?;

    let (musicbox, profile) = file.select_profile(overrides.musicbox.as_deref())?;
    let catalog = profile.to_catalog()?;

    let marker_offset = overrides
        .marker_offset
        .or(file.marker_offset)
        .unwrap_or(DEFAULT_MARKER_OFFSET);
    let marker_offset_top = overrides
        .marker_offset_top
        .or(file.marker_offset_top)
        .unwrap_or(marker_offset);
    let marker_offset_bottom = overrides
        .marker_offset_bottom
        .or(file.marker_offset_bottom)
        .unwrap_or(marker_offset);

    let piece_name = overrides
        .name
        .clone()
        .or_else(|| file.name.clone())
        .unwrap_or_else(|| input.clone());

    let layout = LayoutConfig {
        margin: overrides.margin.or(file.margin).unwrap_or(DEFAULT_MARGIN),
        pitch_spacing: profile.pitch,
        marker_size: overrides
            .marker_size
            .or(file.marker_size)
            .unwrap_or(DEFAULT_MARKER_SIZE),
        marker_offset,
        marker_offset_top,
        marker_offset_bottom,
        font_size: overrides.font_size.or(file.font_size).unwrap_or(DEFAULT_FONT_SIZE),
        divisor: overrides.divisor.or(file.divisor).unwrap_or(DEFAULT_DIVISOR),
        page_width: overrides
            .page_width
            .or(file.page.width)
            .unwrap_or(DEFAULT_PAGE_WIDTH),
        page_height: overrides
            .page_height
            .or(file.page.height)
            .unwrap_or(DEFAULT_PAGE_HEIGHT),
        piece_name,
    };
    layout.validate()?;

    let lower = overrides
        .transpose_lower
        .or(file.transpose.lower)
        .unwrap_or(DEFAULT_TRANSPOSE_LOWER);
    let upper = overrides
        .transpose_upper
        .or(file.transpose.upper)
        .unwrap_or(DEFAULT_TRANSPOSE_UPPER);

    let tracks = match overrides.tracks.clone().or_else(|| file.tracks.clone()) {
        Some(indices) => TrackFilter::Only(indices),
        None => TrackFilter::default(),
    };

    Ok(Settings {
        input: PathBuf::from(input),
        output_prefix: overrides
            .output
            .clone()
            .or_else(|| file.output.clone())
            .unwrap_or_else(|| DEFAULT_OUTPUT_PREFIX.to_string()),
        musicbox,
        catalog,
        layout,
        transpose_range: lower..upper,
        tracks,
        dump_plan: overrides.dump_plan.clone(),
    })
}
