//! Stderr logger for the command-line tool
//!
//! The library only talks to the `log` facade; this backend prints each
//! record as `LEVEL target: message` on standard error.

use log::{Level, Log, Metadata, Record, SetLoggerError};

struct StderrLogger {
    level: Level,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", format_record(record.level(), record.target(), &record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

fn format_record(level: Level, target: &str, message: &str) -> String {
    // Drop the crate prefix from module paths to keep lines short
    let target = target.strip_prefix("punchbox::").unwrap_or(target);
    format!("{:<5} {}: {}", level, target, message)
}

/// Install the stderr logger; `debug` raises the level from info to debug
pub fn init(debug: bool) -> Result<(), SetLoggerError> {
    let level = if debug { Level::Debug } else { Level::Info };
    log::set_boxed_logger(Box::new(StderrLogger { level }))?;
    log::set_max_level(level.to_level_filter());
    Ok(())
}
