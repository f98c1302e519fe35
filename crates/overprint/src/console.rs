//! The console logger handle
//!
//! [`ConsoleLogger`] is what callers hold. Logging methods only enqueue and
//! return immediately; a background worker renders everything in order.
//! Dropping the handle (or calling [`shutdown`](ConsoleLogger::shutdown))
//! drains the queue and joins the worker.

use std::fmt::Display;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::{ConsoleConfig, LineEnding};
use crate::detection::{self, TerminalCapabilities};
use crate::error::ConsoleError;
use crate::level::Severity;
use crate::logging::targets;
use crate::queue::MessageQueue;
use crate::record::LogRecord;
use crate::terminal::TerminalWriter;
use crate::worker::{self, Shared, WorkerHandle, WorkerState};

/// Queued console output with in-place updates
pub struct ConsoleLogger {
    queue: Arc<MessageQueue>,
    shared: Arc<Shared>,
    worker: Mutex<Option<WorkerHandle>>,
    capabilities: TerminalCapabilities,
    line_ending: LineEnding,
}

impl ConsoleLogger {
    /// Create a logger on the configured standard stream
    ///
    /// If the render thread cannot be spawned, a diagnostic is printed and
    /// the logger is returned already stopped.
    #[must_use]
    pub fn new(config: ConsoleConfig) -> Self {
        let caps = config.resolve_capabilities(detection::is_terminal(config.target));
        let writer = TerminalWriter::for_target(config.target, caps, config.line_ending);
        Self::start_or_stopped(writer, &config)
    }

    /// Create a logger from [`ConsoleConfig::from_env`]
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ConsoleConfig::from_env())
    }

    /// Create a logger writing to any stream
    ///
    /// The stream is not a known terminal, so overwrite and colors come from
    /// explicit config overrides only.
    #[must_use]
    pub fn with_writer(writer: Box<dyn Write + Send>, config: ConsoleConfig) -> Self {
        let caps = config.resolve_capabilities(false);
        let writer = TerminalWriter::new(writer, caps, config.line_ending);
        Self::start_or_stopped(writer, &config)
    }

    /// Like [`new`](Self::new), but report a spawn failure
    pub fn try_new(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        let caps = config.resolve_capabilities(detection::is_terminal(config.target));
        let writer = TerminalWriter::for_target(config.target, caps, config.line_ending);
        Self::start(writer, &config)
    }

    /// Like [`with_writer`](Self::with_writer), but report a spawn failure
    pub fn try_with_writer(
        writer: Box<dyn Write + Send>,
        config: ConsoleConfig,
    ) -> Result<Self, ConsoleError> {
        let caps = config.resolve_capabilities(false);
        let writer = TerminalWriter::new(writer, caps, config.line_ending);
        Self::start(writer, &config)
    }

    fn start(writer: TerminalWriter, config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        let capabilities = writer.capabilities();
        let queue = Arc::new(MessageQueue::new());
        let shared = Arc::new(Shared::new(config.min_level));
        let handle = worker::spawn(Arc::clone(&queue), Arc::clone(&shared), writer)
            .map_err(ConsoleError::SpawnFailed)?;
        log::debug!(
            target: targets::CONSOLE,
            "console logger started (overwrite: {:?}, color: {})",
            capabilities.overwrite,
            capabilities.color
        );
        Ok(Self {
            queue,
            shared,
            worker: Mutex::new(Some(handle)),
            capabilities,
            line_ending: config.line_ending,
        })
    }

    fn start_or_stopped(writer: TerminalWriter, config: &ConsoleConfig) -> Self {
        let capabilities = writer.capabilities();
        match Self::start(writer, config) {
            Ok(logger) => logger,
            Err(err) => {
                log::error!(target: targets::CONSOLE, "{err}");
                let _ = writeln!(std::io::stderr(), "overprint: {err}");
                let queue = Arc::new(MessageQueue::new());
                queue.close();
                let shared = Arc::new(Shared::new(config.min_level));
                shared.set_state(WorkerState::Stopped);
                Self {
                    queue,
                    shared,
                    worker: Mutex::new(None),
                    capabilities,
                    line_ending: config.line_ending,
                }
            }
        }
    }

    // ─────────────────────────────────────────────────
    // Logging
    // ─────────────────────────────────────────────────

    /// Queue a prepared record. Never blocks, never fails.
    ///
    /// Returns the record's sequence number, or `None` once the logger has
    /// been shut down (the record is dropped).
    pub fn submit(&self, record: LogRecord) -> Option<u64> {
        self.queue.enqueue(record)
    }

    /// Queue `text` at `severity`, optionally replacing the previous record
    pub fn log(&self, text: impl Into<String>, severity: Severity, replace_previous: bool) {
        self.submit(LogRecord::new(text, severity).replacing(replace_previous));
    }

    /// Queue several lines as one record, joined with the configured line ending
    pub fn log_lines<I, S>(&self, lines: I, severity: Severity, replace_previous: bool)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let record = LogRecord::from_lines(lines, self.line_ending.as_str(), severity);
        self.submit(record.replacing(replace_previous));
    }

    /// Queue the textual form of a value, or `NULL` when absent
    pub fn log_value<T: Display + ?Sized>(
        &self,
        value: Option<&T>,
        severity: Severity,
        replace_previous: bool,
    ) {
        self.submit(LogRecord::from_value(value, severity).replacing(replace_previous));
    }

    /// Replace the previous record with `text` at Info
    pub fn progress(&self, text: impl Into<String>) {
        self.log(text, Severity::Info, true);
    }

    pub fn trace(&self, text: impl Into<String>) {
        self.log(text, Severity::Trace, false);
    }

    pub fn debug(&self, text: impl Into<String>) {
        self.log(text, Severity::Debug, false);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.log(text, Severity::Info, false);
    }

    pub fn warn(&self, text: impl Into<String>) {
        self.log(text, Severity::Warning, false);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.log(text, Severity::Error, false);
    }

    pub fn critical(&self, text: impl Into<String>) {
        self.log(text, Severity::Critical, false);
    }

    // ─────────────────────────────────────────────────
    // State Queries
    // ─────────────────────────────────────────────────

    /// Records waiting to be rendered. Advisory only.
    pub fn queue_count(&self) -> usize {
        self.queue.count()
    }

    /// Minimum level; lower records are discarded when dequeued
    pub fn min_level(&self) -> Severity {
        self.shared.min_level()
    }

    /// Change the minimum level; applies to records not yet rendered
    pub fn set_min_level(&self, level: Severity) {
        self.shared.set_min_level(level);
    }

    pub fn state(&self) -> WorkerState {
        self.shared.state()
    }

    /// Records actually written to the stream
    pub fn rendered_count(&self) -> u64 {
        self.shared.rendered()
    }

    /// Records dropped because writing them failed
    pub fn failed_count(&self) -> u64 {
        self.shared.failed()
    }

    /// What this logger emits on its stream
    pub fn capabilities(&self) -> TerminalCapabilities {
        self.capabilities
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    // ─────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────

    /// Render everything queued so far, then stop and join the worker
    ///
    /// Idempotent. Logging on this handle afterwards is a silent no-op.
    /// Concurrent callers all block until the worker has exited.
    pub fn shutdown(&self) {
        // The lock is held across the join so a second caller waits here
        // instead of finding an empty slot while the worker still drains.
        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = worker.take() {
            handle.stop(&self.shared);
            log::debug!(target: targets::CONSOLE, "console logger shut down");
        }
    }
}

impl Drop for ConsoleLogger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ConsoleLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleLogger")
            .field("state", &self.state())
            .field("queue_count", &self.queue_count())
            .field("min_level", &self.min_level())
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestConsole;

    #[test]
    fn test_logger_starts_running() {
        let tc = TestConsole::new();
        let logger = tc.logger(ConsoleConfig::new());
        logger.info("hello");
        logger.shutdown();
        assert_eq!(logger.state(), WorkerState::Stopped);
        tc.assert_screen(&["hello"]);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let tc = TestConsole::new();
        let logger = tc.logger(ConsoleConfig::new());
        logger.shutdown();
        logger.shutdown();
        assert_eq!(logger.state(), WorkerState::Stopped);
        assert_eq!(logger.queue_count(), 0);
    }

    #[test]
    fn test_log_after_shutdown_is_dropped() {
        let tc = TestConsole::new();
        let logger = tc.logger(ConsoleConfig::new());
        logger.shutdown();
        assert!(logger.submit(LogRecord::new("late", Severity::Info)).is_none());
        logger.info("also late");
        assert_eq!(logger.queue_count(), 0);
        assert!(tc.output().is_empty());
    }

    #[test]
    fn test_drop_drains_queue() {
        let tc = TestConsole::new();
        {
            let logger = tc.logger(ConsoleConfig::new());
            for i in 0..5 {
                logger.info(format!("record {i}"));
            }
        }
        tc.assert_line_count(5);
    }

    #[test]
    fn test_min_level_roundtrip() {
        let tc = TestConsole::new();
        let logger = tc.logger(ConsoleConfig::new().with_min_level(Severity::Debug));
        assert_eq!(logger.min_level(), Severity::Debug);
        logger.set_min_level(Severity::Error);
        assert_eq!(logger.min_level(), Severity::Error);
    }

    #[test]
    fn test_log_value_null() {
        let tc = TestConsole::new();
        let logger = tc.logger(ConsoleConfig::new());
        logger.log_value::<String>(None, Severity::Info, false);
        logger.log_value(Some(&3.5), Severity::Info, false);
        logger.shutdown();
        tc.assert_screen(&["NULL", "3.5"]);
    }

    #[test]
    fn test_log_lines_uses_line_ending() {
        let tc = TestConsole::new();
        let logger = tc.logger(ConsoleConfig::new().with_line_ending(LineEnding::Lf));
        logger.log_lines(["first", "second"], Severity::Info, false);
        logger.shutdown();
        tc.assert_screen(&["first", "second"]);
    }

    #[test]
    fn test_with_writer_defaults_to_plain() {
        let tc = TestConsole::new();
        let logger = ConsoleLogger::with_writer(
            tc.writer(),
            ConsoleConfig::new().with_context(crate::detection::DisplayContext::Interactive),
        );
        assert_eq!(logger.capabilities(), TerminalCapabilities::plain());
    }

    #[test]
    fn test_debug_format() {
        let tc = TestConsole::new();
        let logger = tc.logger(ConsoleConfig::new());
        let debug = format!("{logger:?}");
        assert!(debug.contains("ConsoleLogger"));
        assert!(debug.contains("min_level"));
    }
}
