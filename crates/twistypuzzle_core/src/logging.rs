use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

pub use log::Level;

/// Logger for puzzle construction.
///
/// Only use this for information that the end user should see, such as a
/// piece that could not be built. If the puzzle is working correctly, there
/// should be no log entries. Prefer conventional logging for other uses.
#[derive(Debug, Default, Clone)]
pub struct Logger {
    lines: Arc<Mutex<Vec<LogLine>>>,
}
impl Logger {
    /// Constructs a new logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs a line.
    pub fn log(&self, line: LogLine) {
        self.lines.lock().push(line);
    }
    /// Logs a line with [`Level::Warn`].
    pub fn warn(&self, msg: impl ToString) {
        self.log(LogLine {
            level: Level::Warn,
            msg: msg.to_string(),
        });
    }

    /// Returns all the log lines so far.
    pub fn lines(&self) -> MutexGuard<'_, Vec<LogLine>> {
        self.lines.lock()
    }
}

/// Log line emitted while building a puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Log level.
    pub level: Level,
    /// Log message.
    pub msg: String,
}
