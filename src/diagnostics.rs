//! Leveled diagnostic sink handed to the scanner and record builder.
//!
//! Diagnostics never go to the data output. [`LogDiagnostics`] forwards to the
//! `log` facade; [`MemoryDiagnostics`] keeps messages for inspection.

use log::Level;
use std::cell::RefCell;
use std::fmt;

pub trait Diagnostics {
    fn emit(&self, level: Level, args: fmt::Arguments<'_>);

    fn error(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Error, args);
    }
    fn warn(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Warn, args);
    }
    fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Info, args);
    }
    fn debug(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Debug, args);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        log::log!(target: "fastq_inventory", level, "{args}");
    }
}

#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    messages: RefCell<Vec<(Level, String)>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.borrow().clone()
    }

    /// Messages at `level` or more severe.
    pub fn at_least(&self, level: Level) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(l, _)| *l <= level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        self.messages.borrow_mut().push((level, args.to_string()));
    }
}
