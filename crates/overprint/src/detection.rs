//! Interactive/plain context detection
//!
//! Determines whether cursor movement and colors can be used on an output
//! stream, based on the environment and whether the stream is a terminal.

use console::Term;

use crate::config::{OutputTarget, OverwriteStrategy};

/// Display context representing the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayContext {
    /// Plain context - append-only, uncolored output
    Plain,
    /// Interactive context - in-place updates and colors where the stream allows
    #[default]
    Interactive,
}

impl DisplayContext {
    /// Auto-detect the display context from environment
    #[must_use]
    pub fn detect() -> Self {
        if is_plain_context() {
            Self::Plain
        } else {
            Self::Interactive
        }
    }

    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Interactive)
    }

    #[must_use]
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain)
    }
}

/// Determine if the environment asks for plain output
///
/// `NO_COLOR` is not part of this: it only removes colors and
/// is handled by [`ConsoleConfig::from_env`](crate::ConsoleConfig::from_env).
#[must_use]
pub fn is_plain_context() -> bool {
    plain_context_from(|key| std::env::var(key).ok())
}

pub(crate) fn plain_context_from(var: impl Fn(&str) -> Option<String>) -> bool {
    var("CI").is_some()
        || var("OVERPRINT_PLAIN").is_some()
        || var("TERM").is_some_and(|term| term == "dumb")
}

/// Check whether a standard stream is attached to a terminal
#[must_use]
pub fn is_terminal(target: OutputTarget) -> bool {
    match target {
        OutputTarget::Stdout => Term::stdout().is_term(),
        OutputTarget::Stderr => Term::stderr().is_term(),
    }
}

/// What the render loop may do on a particular output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    /// How replace-previous records are rendered
    pub overwrite: OverwriteStrategy,
    /// Whether severity colors are emitted
    pub color: bool,
}

impl TerminalCapabilities {
    /// Full ANSI support: in-place updates and colors
    #[must_use]
    pub fn ansi() -> Self {
        Self {
            overwrite: OverwriteStrategy::Ansi,
            color: true,
        }
    }

    /// Append-only, uncolored output
    #[must_use]
    pub fn plain() -> Self {
        Self {
            overwrite: OverwriteStrategy::Append,
            color: false,
        }
    }

    /// Capabilities for a stream in the given context
    #[must_use]
    pub fn for_stream(context: DisplayContext, is_terminal: bool) -> Self {
        if context.is_interactive() && is_terminal {
            Self::ansi()
        } else {
            Self::plain()
        }
    }
}
