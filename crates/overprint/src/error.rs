//! Error types.
//!
//! Producers never see these: logging calls cannot fail. They surface only
//! from setup (`global::init`, `ConsoleLogger::try_*` constructors) and
//! inside the render worker, which reports and swallows them.

use std::fmt;
use std::io;

/// Failure setting up a console logger.
#[derive(Debug)]
pub enum ConsoleError {
    /// A global logger instance is already installed.
    AlreadyInitialized,
    /// The render worker thread could not be spawned.
    SpawnFailed(io::Error),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "console logger already initialized"),
            Self::SpawnFailed(err) => write!(f, "failed to spawn render worker: {err}"),
        }
    }
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AlreadyInitialized => None,
            Self::SpawnFailed(err) => Some(err),
        }
    }
}

/// Failure writing one frame to the output stream.
#[derive(Debug)]
pub struct RenderError {
    sequence: u64,
    source: io::Error,
}

impl RenderError {
    pub(crate) fn new(sequence: u64, source: io::Error) -> Self {
        Self { sequence, source }
    }

    /// Sequence number of the record that failed to render.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn io_error(&self) -> &io::Error {
        &self.source
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to render record #{}: {}", self.sequence, self.source)
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_console_error_display() {
        assert_eq!(
            ConsoleError::AlreadyInitialized.to_string(),
            "console logger already initialized"
        );
        let err = ConsoleError::SpawnFailed(io::Error::new(io::ErrorKind::Other, "no threads"));
        assert!(err.to_string().contains("no threads"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::new(7, io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert_eq!(err.sequence(), 7);
        assert_eq!(err.io_error().kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(err.to_string(), "failed to render record #7: pipe closed");
    }
}
