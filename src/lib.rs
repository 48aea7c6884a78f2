//! Punchbox: punch strips for paper-tape music boxes
//!
//! Reads the notes of a performance, finds the transposition that lets the
//! most of them play on a given music box, flags notes that repeat faster
//! than the mechanism allows, and lays the result out as printable staves
//! of punch positions, one SVG file per page.

pub mod api;
pub mod config;
pub mod converters;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod renderers;
pub mod transposition;
pub mod utils;

// Re-export commonly used types
pub use api::{export_punch_sheets, plan_punch_sheets, PunchPlan, RunReport};
pub use config::{LayoutConfig, Settings};
pub use error::{PunchboxError, Result};
pub use models::{MappedNote, NoteEvent, PitchCatalog};
