//! Punchbox API
//!
//! Entry points used by the binary and by library callers. `plan_punch_sheets`
//! works on in-memory note events; `export_punch_sheets` runs a whole batch
//! from resolved settings.

pub mod export;

pub use export::{export_punch_sheets, plan_punch_sheets, write_display_list_json, PunchPlan, RunReport};
