//! YAML configuration file model
//!
//! Mirrors `punchbox.yaml`. Every field is optional; missing values fall
//! back to the command line or to `defaults`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::defaults::*;
use super::{ConfigError, Result};
use crate::models::PitchCatalog;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    /// Input MIDI file
    pub filename: Option<String>,
    /// Output file prefix
    pub output: Option<String>,
    /// Piece name printed in stave titles
    pub name: Option<String>,
    pub default_musicbox: Option<String>,
    pub marker_offset: Option<f64>,
    pub marker_offset_top: Option<f64>,
    pub marker_offset_bottom: Option<f64>,
    pub marker_size: Option<f64>,
    pub margin: Option<f64>,
    pub font_size: Option<f64>,
    pub divisor: Option<f64>,
    pub transpose: TransposeBounds,
    pub page: PageSize,
    /// MIDI track indices to read
    pub tracks: Option<Vec<usize>>,
    /// Instrument profiles by name
    pub boxen: BTreeMap<String, MusicBoxProfile>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct TransposeBounds {
    pub lower: Option<i32>,
    pub upper: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct PageSize {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// One instrument profile
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MusicBoxProfile {
    /// Playable pitches in declared order
    #[serde(default = "default_note_data")]
    pub note_data: Vec<i32>,

    /// Track lines run opposite to the declared order
    #[serde(default)]
    pub reverse: bool,

    /// Spacing between track lines (mm)
    #[serde(default = "default_pitch_spacing")]
    pub pitch: f64,

    /// Minimum same-pitch repeat distance (mm)
    #[serde(default = "default_note_collision")]
    pub note_collision: f64,
}

fn default_note_data() -> Vec<i32> {
    DEFAULT_NOTE_DATA.to_vec()
}

fn default_pitch_spacing() -> f64 {
    DEFAULT_PITCH_SPACING
}

fn default_note_collision() -> f64 {
    DEFAULT_NOTE_COLLISION
}

impl Default for MusicBoxProfile {
    fn default() -> Self {
        Self {
            note_data: default_note_data(),
            reverse: false,
            pitch: DEFAULT_PITCH_SPACING,
            note_collision: DEFAULT_NOTE_COLLISION,
        }
    }
}

impl MusicBoxProfile {
    pub fn to_catalog(&self) -> Result<PitchCatalog> {
        Ok(PitchCatalog::new(self.note_data.clone(), self.reverse, self.note_collision)?)
    }
}

impl ConfigFile {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a configuration file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Self::from_yaml(&text)
    }

    /// Load the file if present, otherwise start from an empty configuration
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No {} found, using built-in defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Pick the instrument profile: explicit name, then `default_musicbox`,
    /// then the only declared profile, then the built-in default when none
    /// are declared at all.
    pub fn select_profile(&self, requested: Option<&str>) -> Result<(String, MusicBoxProfile)> {
        let name = requested.or(self.default_musicbox.as_deref());

        match name {
            Some(name) => {
                if let Some(profile) = self.boxen.get(name) {
                    return Ok((name.to_string(), profile.clone()));
                }
                if self.boxen.is_empty() && name == DEFAULT_MUSICBOX {
                    return Ok((name.to_string(), MusicBoxProfile::default()));
                }
                Err(ConfigError::UnknownMusicBox {
                    name: name.to_string(),
                    available: self.boxen.keys().cloned().collect(),
                })
            }
            None => match self.boxen.len() {
                0 => Ok((DEFAULT_MUSICBOX.to_string(), MusicBoxProfile::default())),
                1 => {
                    let (name, profile) = self.boxen.iter().next().ok_or(ConfigError::NoMusicBox {
                        available: Vec::new(),
                    })?;
                    Ok((name.clone(), profile.clone()))
                }
                _ => Err(ConfigError::NoMusicBox {
                    available: self.boxen.keys().cloned().collect(),
                }),
            },
        }
    }
}
