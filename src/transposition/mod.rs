//! Transposition onto a pinned instrument
//!
//! - search.rs: picks the semitone shift with the best playable coverage
//! - mapper.rs: places transposed notes on track lines, snapping the rest

pub mod mapper;
pub mod search;

pub use mapper::PitchMapper;
pub use search::{
    find_best_transposition, Coverage, SearchOutcome, TranspositionCandidate, TranspositionResult,
};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranspositionError {
    #[error("no note events to transpose")]
    NoData,

    #[error("transposition range {lower}..{upper} holds no shift")]
    EmptyRange { lower: i32, upper: i32 },
}

pub type Result<T> = std::result::Result<T, TranspositionError>;
