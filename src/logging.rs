//! Stderr logger for the command-line tool.

use std::sync::OnceLock;

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Environment variable holding a default level (`error` ... `trace`).
pub const LOG_LEVEL_ENV: &str = "FASTQ_INVENTORY_LOG";

struct Logger {
    level: Level,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            eprintln!("{} {} {}", timestamp, record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

pub fn level_from_env() -> Option<Level> {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .and_then(|filter| filter.to_level())
}

/// Level for a `-v` count on top of `base`; `quiet` keeps errors only.
pub fn level_for(base: Level, verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::Error;
    }
    match (base as usize).saturating_add(verbose as usize) {
        1 => Level::Error,
        2 => Level::Warn,
        3 => Level::Info,
        4 => Level::Debug,
        _ => Level::Trace,
    }
}

pub fn init(level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<Logger> = OnceLock::new();

    let init_call = LOGGER.get().is_none();
    let logger = LOGGER.get_or_init(|| Logger { level });

    if init_call {
        log::set_logger(logger)?;
        log::set_max_level(logger.level.to_level_filter());
    }
    Ok(())
}
