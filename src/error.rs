//! Error type for a whole punch sheet run
//!
//! Each stage has its own error enum; this one wraps them so the pipeline and
//! the binary can use `?` throughout.

use thiserror::Error;

use crate::config::ConfigError;
use crate::converters::MidiImportError;
use crate::renderers::LayoutError;
use crate::transposition::TranspositionError;

#[derive(Debug, Error)]
pub enum PunchboxError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("MIDI import failed: {0}")]
    MidiImport(#[from] MidiImportError),

    #[error("transposition failed: {0}")]
    Transposition(#[from] TranspositionError),

    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("cannot write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot serialize display list: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PunchboxError>;
