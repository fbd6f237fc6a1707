//! User interface module - progress reporting for CI logs.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - `output` - Publishing step outputs and exported variables
//! - This module - The [`Logger`] and the sinks lines are written to

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use console::style;

pub mod formatter;
pub mod output;

pub use formatter::LineKind;
pub use output::ActionOutput;

/// Destination for formatted log lines.
pub trait Reporter: Send + Sync {
    fn emit(&self, kind: LineKind, line: &str);
}

/// Writes lines to stdout, where the runner picks up workflow commands.
///
/// Only plain informational lines are styled; workflow commands must reach the
/// runner verbatim.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn emit(&self, kind: LineKind, line: &str) {
        match kind {
            LineKind::Info => println!("{}", style(line).green()),
            LineKind::Detail => println!("{}", style(line).dim()),
            LineKind::Command => println!("{}", style(line).cyan()),
            _ => println!("{}", line),
        }
    }
}

/// Captures lines in memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line emitted so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl Reporter for MemoryReporter {
    fn emit(&self, _kind: LineKind, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

/// Stage-grouped progress logger.
///
/// At most one group is open at a time: starting a group closes the previous
/// one, and closing when nothing is open emits nothing.
pub struct Logger {
    reporter: Arc<dyn Reporter>,
    group_open: AtomicBool,
}

impl Logger {
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Logger {
            reporter,
            group_open: AtomicBool::new(false),
        }
    }

    pub fn console() -> Self {
        Self::new(Arc::new(ConsoleReporter))
    }

    fn emit(&self, kind: LineKind, line: String) {
        self.reporter.emit(kind, &line);
    }

    pub fn start_group(&self, title: &str) {
        self.end_group();
        self.emit(LineKind::GroupStart, formatter::group_start(title));
        self.group_open.store(true, Ordering::SeqCst);
    }

    pub fn end_group(&self) {
        if self.group_open.swap(false, Ordering::SeqCst) {
            self.emit(LineKind::GroupEnd, formatter::group_end());
        }
    }

    pub fn info(&self, message: &str) {
        self.emit(LineKind::Info, formatter::info(message));
    }

    pub fn detail(&self, message: &str) {
        self.emit(LineKind::Detail, formatter::detail(message));
    }

    pub fn command(&self, command_line: &str) {
        self.emit(LineKind::Command, formatter::command(command_line));
    }

    pub fn warn(&self, message: &str) {
        self.emit(LineKind::Warning, formatter::warning(message));
    }

    pub fn error(&self, message: &str) {
        self.emit(LineKind::Error, formatter::error(message));
    }

    /// Emit an already formatted workflow command.
    pub fn workflow(&self, line: String) {
        self.emit(LineKind::Workflow, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_logger() -> (Logger, Arc<MemoryReporter>) {
        let reporter = Arc::new(MemoryReporter::new());
        (Logger::new(reporter.clone()), reporter)
    }

    #[test]
    fn test_groups_close_before_next_group() {
        let (logger, reporter) = memory_logger();
        logger.start_group("Creating blobs...");
        logger.start_group("Creating tree...");
        logger.end_group();
        logger.end_group();

        assert_eq!(
            reporter.lines(),
            vec![
                "::group::Creating blobs...",
                "::endgroup::",
                "::group::Creating tree...",
                "::endgroup::",
            ]
        );
    }

    #[test]
    fn test_end_group_without_open_group_is_silent() {
        let (logger, reporter) = memory_logger();
        logger.end_group();
        logger.info("No update required.");

        assert_eq!(reporter.lines(), vec!["> No update required."]);
    }

    #[test]
    fn test_console_reporter_does_not_panic() {
        // Visual verification test - output is printed to stdout
        let logger = Logger::console();
        logger.start_group("group");
        logger.info("info");
        logger.warn("warning");
        logger.end_group();
    }
}
