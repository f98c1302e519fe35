//! Process-wide convenience accessor
//!
//! Wraps one shared [`ConsoleLogger`] for code that would rather not pass a
//! handle around. The instance is created lazily from
//! [`ConsoleConfig::from_env`] on first use. [`shutdown`] drains and joins it
//! and clears the slot; any later call creates a fresh instance.
//!
//! The slot is a `static`, which Rust never drops. Hold the [`GlobalGuard`]
//! returned by [`init`], [`install`] or [`guard`] for the life of `main` so
//! queued records are rendered before the process exits:
//!
//! ```rust,no_run
//! use overprint::{global, Severity};
//!
//! let _console = global::guard();
//! global::log("starting", Severity::Info, false);
//! // dropping `_console` drains the queue and joins the worker
//! ```

use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::ConsoleConfig;
use crate::console::ConsoleLogger;
use crate::error::ConsoleError;
use crate::level::Severity;

static INSTANCE: Mutex<Option<Arc<ConsoleLogger>>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<Arc<ConsoleLogger>>> {
    INSTANCE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Get the global logger, creating it if needed
#[must_use]
pub fn get_instance() -> Arc<ConsoleLogger> {
    let mut slot = slot();
    Arc::clone(slot.get_or_insert_with(|| Arc::new(ConsoleLogger::from_env())))
}

/// Shuts the global logger down when dropped
///
/// Only the instance the guard was created for is cleared from the slot; if
/// that one was already shut down and replaced, the replacement is left alone.
#[must_use = "dropping the guard immediately shuts the global logger down"]
pub struct GlobalGuard {
    logger: Arc<ConsoleLogger>,
}

impl GlobalGuard {
    /// The guarded logger
    pub fn logger(&self) -> &Arc<ConsoleLogger> {
        &self.logger
    }
}

impl Drop for GlobalGuard {
    fn drop(&mut self) {
        {
            let mut slot = slot();
            if slot
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, &self.logger))
            {
                slot.take();
            }
        }
        self.logger.shutdown();
    }
}

impl std::fmt::Debug for GlobalGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalGuard")
            .field("logger", &self.logger)
            .finish()
    }
}

/// Guard the global logger, creating it if needed
pub fn guard() -> GlobalGuard {
    GlobalGuard {
        logger: get_instance(),
    }
}

/// Install a configured global logger
///
/// Must be called before any other global use; returns an error if an
/// instance already exists.
pub fn init(config: ConsoleConfig) -> Result<GlobalGuard, ConsoleError> {
    let mut slot = slot();
    if slot.is_some() {
        return Err(ConsoleError::AlreadyInitialized);
    }
    let logger = Arc::new(ConsoleLogger::try_new(config)?);
    *slot = Some(Arc::clone(&logger));
    Ok(GlobalGuard { logger })
}

/// Install an already constructed logger as the global one
pub fn install(logger: ConsoleLogger) -> Result<GlobalGuard, ConsoleError> {
    let mut slot = slot();
    if slot.is_some() {
        return Err(ConsoleError::AlreadyInitialized);
    }
    let logger = Arc::new(logger);
    *slot = Some(Arc::clone(&logger));
    Ok(GlobalGuard { logger })
}

/// Whether a global instance currently exists
#[must_use]
pub fn is_initialized() -> bool {
    slot().is_some()
}

/// Drain, stop and clear the global logger
///
/// A no-op when no instance exists. Handles obtained earlier from
/// [`get_instance`] stay valid but are stopped.
pub fn shutdown() {
    let logger = slot().take();
    if let Some(logger) = logger {
        logger.shutdown();
    }
}

/// Queue `text` on the global logger
pub fn log(text: impl Into<String>, severity: Severity, replace_previous: bool) {
    get_instance().log(text, severity, replace_previous);
}

/// Queue several lines as one record on the global logger
pub fn log_lines<I, S>(lines: I, severity: Severity, replace_previous: bool)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    get_instance().log_lines(lines, severity, replace_previous);
}

/// Queue the textual form of a value (or `NULL`) on the global logger
pub fn log_value<T: Display + ?Sized>(value: Option<&T>, severity: Severity, replace_previous: bool) {
    get_instance().log_value(value, severity, replace_previous);
}

/// Advisory count of records queued on the global logger
#[must_use]
pub fn queue_count() -> usize {
    get_instance().queue_count()
}

#[must_use]
pub fn min_level() -> Severity {
    get_instance().min_level()
}

pub fn set_min_level(level: Severity) {
    get_instance().set_min_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestConsole;
    use crate::worker::WorkerState;

    // The global slot is shared by every test in this binary, so all
    // global behaviour is exercised from this single test.
    #[test]
    fn test_global_lifecycle() {
        shutdown();
        shutdown();
        assert!(!is_initialized());

        let tc = TestConsole::new();
        let guard = install(tc.logger(ConsoleConfig::new())).unwrap();
        let installed = Arc::clone(guard.logger());
        assert!(is_initialized());
        assert!(matches!(
            install(tc.logger(ConsoleConfig::new())),
            Err(ConsoleError::AlreadyInitialized)
        ));
        assert!(matches!(init(ConsoleConfig::new()), Err(ConsoleError::AlreadyInitialized)));

        let same = get_instance();
        assert!(Arc::ptr_eq(&installed, &same));

        set_min_level(Severity::Warning);
        assert_eq!(min_level(), Severity::Warning);
        log("hidden", Severity::Info, false);
        log("shown", Severity::Warning, false);
        log_lines(["a", "b"], Severity::Error, false);
        log_value::<u8>(None, Severity::Critical, false);

        shutdown();
        assert!(!is_initialized());
        assert_eq!(installed.state(), WorkerState::Stopped);
        tc.assert_not_contains("hidden");
        tc.assert_contains("shown");
        tc.assert_contains("NULL");

        // Logging after shutdown resurrects a fresh instance.
        assert_eq!(queue_count(), 0);
        assert!(is_initialized());
        let fresh = get_instance();
        assert!(!Arc::ptr_eq(&installed, &fresh));
        assert_eq!(fresh.min_level(), ConsoleConfig::from_env().min_level);

        // A stale guard leaves the replacement instance in place.
        drop(guard);
        assert!(is_initialized());
        shutdown();
        assert!(!is_initialized());
        assert_eq!(fresh.state(), WorkerState::Stopped);

        // Dropping a live guard drains everything still queued.
        let tc = TestConsole::new();
        let guard = install(tc.logger(ConsoleConfig::new())).unwrap();
        for i in 0..20 {
            log(format!("queued {i}"), Severity::Info, false);
        }
        drop(guard);
        assert!(!is_initialized());
        tc.assert_line_count(20);
    }
}
