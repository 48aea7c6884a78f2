//! Utility modules for punchbox

pub mod logger;
