//! Models module for punchbox
//!
//! Data structures shared by the transposition search, the collision
//! diagnostics and the stave layout engine.

pub mod catalog;
pub mod note;
pub mod pitch_name;

// Re-export commonly used types
pub use catalog::{CatalogError, PitchCatalog};
pub use note::{MappedNote, NoteEvent};
pub use pitch_name::note_name;
