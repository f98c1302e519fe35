//! Centralized configuration for console loggers.
//!
//! `ConsoleConfig` is a plain value: build it programmatically or from
//! environment variables, then hand it to [`ConsoleLogger`](crate::ConsoleLogger).

use std::env;

use crate::detection::{self, DisplayContext, TerminalCapabilities};
use crate::level::Severity;

/// Standard stream the logger writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    #[default]
    Stderr,
}

/// How replace-previous records reach the screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverwriteStrategy {
    /// Cursor-up, erase-line and carriage-return escape sequences
    #[default]
    Ansi,
    /// Plain appended lines; replace-previous only updates bookkeeping
    Append,
}

/// Line terminator written after every visual line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// The platform line separator
    #[must_use]
    pub fn platform() -> Self {
        if cfg!(windows) { Self::CrLf } else { Self::Lf }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

impl Default for LineEnding {
    fn default() -> Self {
        Self::platform()
    }
}

/// Configuration for a console logger
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Records below this level are discarded at render time
    pub min_level: Severity,
    /// Stream used by [`ConsoleLogger::new`](crate::ConsoleLogger::new)
    pub target: OutputTarget,
    /// Override display context (None = auto-detect)
    pub context: Option<DisplayContext>,
    /// `Some(true)` forces colors and ANSI overwrite even when not on a
    /// terminal; `Some(false)` disables colors only
    pub force_color: Option<bool>,
    /// Force plain append-only output
    pub force_plain: bool,
    /// Override the detected overwrite strategy
    pub strategy: Option<OverwriteStrategy>,
    /// Terminator for rendered lines and for joining multi-line input
    pub line_ending: LineEnding,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            min_level: Severity::Info,
            target: OutputTarget::Stderr,
            context: None,
            force_color: None,
            force_plain: false,
            strategy: None,
            line_ending: LineEnding::platform(),
        }
    }
}

impl ConsoleConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables
    ///
    /// # Environment Variables
    ///
    /// | Variable | Values | Description |
    /// |----------|--------|-------------|
    /// | `OVERPRINT_LOG` | trace/debug/info/warn/error/critical | Minimum level |
    /// | `OVERPRINT_TARGET` | stdout/stderr | Output stream |
    /// | `OVERPRINT_FORCE_COLOR` | (set) | Force colors and in-place updates |
    /// | `OVERPRINT_PLAIN` | (set) | Force plain, append-only output |
    /// | `NO_COLOR` | (set) | Disable colors; in-place updates stay on |
    /// | `CI`, `TERM=dumb` | (set) | Treat the stream as non-interactive |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `var`
    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = var("OVERPRINT_LOG") {
            match level.parse() {
                Ok(level) => config.min_level = level,
                Err(err) => {
                    log::warn!(target: crate::logging::targets::CONFIG, "ignoring OVERPRINT_LOG: {err}");
                }
            }
        }

        if let Some(target) = var("OVERPRINT_TARGET") {
            config.target = match target.to_lowercase().as_str() {
                "stdout" | "out" => OutputTarget::Stdout,
                // "stderr" and any other value default to Stderr
                _ => OutputTarget::Stderr,
            };
        }

        // NO_COLOR removes colors only; in-place updates keep working.
        if var("OVERPRINT_FORCE_COLOR").is_some() {
            config.force_color = Some(true);
        } else if var("NO_COLOR").is_some() {
            config.force_color = Some(false);
        }
        if var("OVERPRINT_PLAIN").is_some() {
            config.force_plain = true;
        }
        config.context = Some(if detection::plain_context_from(&var) {
            DisplayContext::Plain
        } else {
            DisplayContext::Interactive
        });

        config
    }

    // ─────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────

    /// Set the minimum level
    #[must_use]
    pub fn with_min_level(mut self, level: Severity) -> Self {
        self.min_level = level;
        self
    }

    /// Set the output stream
    #[must_use]
    pub fn with_target(mut self, target: OutputTarget) -> Self {
        self.target = target;
        self
    }

    /// Force color output
    #[must_use]
    pub fn force_color(mut self, force: bool) -> Self {
        self.force_color = Some(force);
        self
    }

    /// Enable plain text mode (append-only, no colors)
    #[must_use]
    pub fn plain_mode(mut self) -> Self {
        self.force_plain = true;
        self
    }

    /// Set the overwrite strategy explicitly
    #[must_use]
    pub fn with_strategy(mut self, strategy: OverwriteStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Set display context explicitly
    #[must_use]
    pub fn with_context(mut self, context: DisplayContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the line terminator
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    // ─────────────────────────────────────────────────
    // Resolution Methods
    // ─────────────────────────────────────────────────

    /// Resolve the display context based on config and environment
    #[must_use]
    pub fn resolve_context(&self) -> DisplayContext {
        if self.force_plain {
            return DisplayContext::Plain;
        }
        if let Some(true) = self.force_color {
            return DisplayContext::Interactive;
        }
        self.context.unwrap_or_else(DisplayContext::detect)
    }

    /// Resolve what the render loop may emit on a stream
    ///
    /// `is_terminal` says whether the stream is attached to a terminal.
    /// Plain mode wins over everything, then explicit overrides, then
    /// detection.
    #[must_use]
    pub fn resolve_capabilities(&self, is_terminal: bool) -> TerminalCapabilities {
        if self.force_plain {
            return TerminalCapabilities::plain();
        }

        let forced = self.force_color == Some(true);
        let mut caps = if forced {
            TerminalCapabilities::ansi()
        } else {
            TerminalCapabilities::for_stream(self.resolve_context(), is_terminal)
        };

        if self.force_color == Some(false) {
            caps.color = false;
        }
        if let Some(strategy) = self.strategy {
            caps.overwrite = strategy;
        }
        caps
    }
}
