//! `log` facade bridge.
//!
//! Installs a `log` crate logger that turns every enabled record into a
//! queued [`LogRecord`]. Formatting and colors are left to the render loop,
//! so `log::warn!` lines get the same treatment as direct calls.
//!
//! ```ignore
//! use overprint::logging::ConsoleLogBridge;
//!
//! ConsoleLogBridge::builder(console)
//!     .level(log::Level::Debug)
//!     .with_targets(true)
//!     .init()?;
//! ```

use std::sync::Arc;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::console::ConsoleLogger;
use crate::record::LogRecord;

/// A `log` logger that queues records on a [`ConsoleLogger`].
pub struct ConsoleLogBridge {
    console: Arc<ConsoleLogger>,
    min_level: Level,
    show_targets: bool,
}

impl ConsoleLogBridge {
    /// Create a bridge with the given minimum level.
    #[must_use]
    pub fn new(console: Arc<ConsoleLogger>, min_level: Level) -> Self {
        Self {
            console,
            min_level,
            show_targets: false,
        }
    }

    /// Create a bridge using the builder pattern.
    #[must_use]
    pub fn builder(console: Arc<ConsoleLogger>) -> ConsoleLogBridgeBuilder {
        ConsoleLogBridgeBuilder::new(console)
    }

    /// Initialize as the global `log` logger.
    ///
    /// Returns an error if a logger has already been set.
    pub fn init(console: Arc<ConsoleLogger>, min_level: Level) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(Self::new(console, min_level)))?;
        log::set_max_level(min_level.to_level_filter());
        Ok(())
    }

    /// Initialize as the global logger, ignoring errors if already set.
    pub fn try_init(console: Arc<ConsoleLogger>, min_level: Level) {
        let _ = Self::init(console, min_level);
    }

    fn record_to_log_record(&self, record: &Record) -> LogRecord {
        let target = self.show_targets.then(|| record.target());
        let text = super::format_bridged(target, &record.args().to_string(), &[]);
        LogRecord::new(text, record.level().into())
    }
}

/// Builder for configuring the `log` bridge.
pub struct ConsoleLogBridgeBuilder {
    console: Arc<ConsoleLogger>,
    min_level: Level,
    show_targets: bool,
}

impl ConsoleLogBridgeBuilder {
    /// Create a new builder with default settings.
    #[must_use]
    pub fn new(console: Arc<ConsoleLogger>) -> Self {
        Self {
            console,
            min_level: Level::Info,
            show_targets: false,
        }
    }

    /// Set the minimum log level.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Set the minimum log level from a LevelFilter.
    #[must_use]
    pub fn level_filter(mut self, filter: LevelFilter) -> Self {
        self.min_level = filter.to_level().unwrap_or(Level::Trace);
        self
    }

    /// Prefix each message with its target.
    #[must_use]
    pub fn with_targets(mut self, show: bool) -> Self {
        self.show_targets = show;
        self
    }

    /// Build the bridge without installing it.
    #[must_use]
    pub fn build(self) -> ConsoleLogBridge {
        ConsoleLogBridge {
            console: self.console,
            min_level: self.min_level,
            show_targets: self.show_targets,
        }
    }

    /// Build and install as the global logger.
    ///
    /// Returns an error if a logger has already been set.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.min_level;
        log::set_boxed_logger(Box::new(self.build()))?;
        log::set_max_level(level.to_level_filter());
        Ok(())
    }

    /// Build and install, ignoring errors if already set.
    pub fn try_init(self) {
        let _ = self.init();
    }
}

impl Log for ConsoleLogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.min_level && !super::is_internal_target(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.console.submit(self.record_to_log_record(record));
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleConfig;
    use crate::level::Severity;
    use crate::testing::TestConsole;

    fn metadata(level: Level, target: &str) -> Metadata<'_> {
        Metadata::builder().level(level).target(target).build()
    }

    fn console(tc: &TestConsole) -> Arc<ConsoleLogger> {
        Arc::new(tc.logger(ConsoleConfig::new().with_min_level(Severity::Trace)))
    }

    #[test]
    fn test_bridge_enabled() {
        let tc = TestConsole::new();
        let bridge = ConsoleLogBridge::new(console(&tc), Level::Info);

        assert!(bridge.enabled(&metadata(Level::Error, "app")));
        assert!(bridge.enabled(&metadata(Level::Info, "app")));
        assert!(!bridge.enabled(&metadata(Level::Debug, "app")));
    }

    #[test]
    fn test_bridge_skips_internal_targets() {
        let tc = TestConsole::new();
        let bridge = ConsoleLogBridge::new(console(&tc), Level::Trace);
        assert!(!bridge.enabled(&metadata(Level::Error, "overprint::render")));
    }

    #[test]
    fn test_bridge_queues_records() {
        let tc = TestConsole::new();
        let console = console(&tc);
        let bridge = ConsoleLogBridge::builder(Arc::clone(&console))
            .level(Level::Debug)
            .with_targets(true)
            .build();

        bridge.log(
            &Record::builder()
                .args(format_args!("cache warmed"))
                .level(Level::Warn)
                .target("app::cache")
                .build(),
        );
        bridge.log(
            &Record::builder()
                .args(format_args!("too chatty"))
                .level(Level::Trace)
                .target("app")
                .build(),
        );
        console.shutdown();

        tc.assert_screen(&["app::cache: cache warmed"]);
    }

    #[test]
    fn test_builder_level_filter() {
        let tc = TestConsole::new();
        let bridge = ConsoleLogBridge::builder(console(&tc))
            .level_filter(LevelFilter::Warn)
            .build();
        assert_eq!(bridge.min_level, Level::Warn);
        assert!(!bridge.show_targets);
    }
}
