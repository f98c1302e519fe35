//! Severity levels for console records.
//!
//! Levels are ordered from least to most severe and drive both the
//! minimum-level cutoff and the foreground color used when rendering.

use std::fmt;
use std::str::FromStr;

use console::{Color, Style};

/// Ordered severity of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Severity {
    /// Very verbose internal detail.
    Trace = 0,
    /// Diagnostic output.
    Debug = 1,
    /// Normal output, rendered in the terminal's current foreground.
    #[default]
    Info = 2,
    /// Something unexpected but recoverable.
    Warning = 3,
    /// An operation failed.
    Error = 4,
    /// The process is unlikely to continue.
    Critical = 5,
}

impl Severity {
    /// All levels, least severe first.
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Short uppercase label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Critical => "CRIT",
        }
    }

    /// Foreground color for this level, `None` for the terminal default.
    #[must_use]
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Trace => Some(Color::Black),
            Self::Debug => Some(Color::Cyan),
            Self::Info => None,
            Self::Warning => Some(Color::Yellow),
            Self::Error | Self::Critical => Some(Color::Red),
        }
    }

    /// Style applied to every line of a record at this level.
    ///
    /// Returns `None` when the level keeps the current foreground, in which
    /// case no color sequence (and no reset) is written at all.
    #[must_use]
    pub fn style(self) -> Option<Style> {
        let color = self.color()?;
        let style = Style::new().fg(color).force_styling(true);
        Some(match self {
            Self::Trace | Self::Critical => style.bright(),
            _ => style,
        })
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Trace,
            1 => Self::Debug,
            2 => Self::Info,
            3 => Self::Warning,
            4 => Self::Error,
            _ => Self::Critical,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a string does not name a severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeverityError(String);

impl fmt::Display for ParseSeverityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown severity '{}'", self.0)
    }
}

impl std::error::Error for ParseSeverityError {}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" | "crit" | "fatal" => Ok(Self::Critical),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warning,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warning,
            tracing::Level::INFO => Self::Info,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::TRACE => Self::Trace,
        }
    }
}

impl Severity {
    /// The closest `log` filter that lets this level (and above) through.
    #[must_use]
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Trace => log::LevelFilter::Trace,
            Self::Debug => log::LevelFilter::Debug,
            Self::Info => log::LevelFilter::Info,
            Self::Warning => log::LevelFilter::Warn,
            Self::Error | Self::Critical => log::LevelFilter::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Severity::Trace < Severity::Debug);
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn test_default_is_info() {
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn test_parse() {
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("WARNING".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!(" Critical ".parse::<Severity>(), Ok(Severity::Critical));
        assert_eq!("fatal".parse::<Severity>(), Ok(Severity::Critical));
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn test_parse_error_message() {
        let err = "loud".parse::<Severity>().unwrap_err();
        assert_eq!(err.to_string(), "unknown severity 'loud'");
    }

    #[test]
    fn test_info_has_no_style() {
        assert!(Severity::Info.color().is_none());
        assert!(Severity::Info.style().is_none());
        assert!(Severity::Error.style().is_some());
    }

    #[test]
    fn test_u8_roundtrip_covers_all() {
        for level in Severity::ALL {
            assert_eq!(Severity::from_u8(level as u8), level);
        }
    }

    #[test]
    fn test_from_log_level() {
        assert_eq!(Severity::from(log::Level::Warn), Severity::Warning);
        assert_eq!(Severity::from(log::Level::Trace), Severity::Trace);
    }

    #[test]
    fn test_from_tracing_level() {
        assert_eq!(Severity::from(tracing::Level::ERROR), Severity::Error);
        assert_eq!(Severity::from(tracing::Level::DEBUG), Severity::Debug);
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(Severity::Critical.to_level_filter(), log::LevelFilter::Error);
        assert_eq!(Severity::Info.to_level_filter(), log::LevelFilter::Info);
    }
}
