//! The unit of console output.

use std::fmt::Display;

use crate::level::Severity;

/// Marker rendered when a value has no textual representation.
pub const NULL_MARKER: &str = "NULL";

/// One queued unit of output.
///
/// A record is immutable once built. The queue stamps it with a global
/// sequence number on enqueue; the render loop only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    text: String,
    severity: Severity,
    replace_previous: bool,
    sequence: u64,
}

impl LogRecord {
    /// Create a record that appends below previous output.
    #[must_use]
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
            replace_previous: false,
            sequence: 0,
        }
    }

    /// Create a record from several lines joined with `separator`.
    #[must_use]
    pub fn from_lines<I, S>(lines: I, separator: &str, severity: Severity) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                text.push_str(separator);
            }
            text.push_str(line.as_ref());
        }
        Self::new(text, severity)
    }

    /// Create a record from an optional value, using [`NULL_MARKER`] when absent.
    #[must_use]
    pub fn from_value<T: Display + ?Sized>(value: Option<&T>, severity: Severity) -> Self {
        let text = value.map_or_else(|| NULL_MARKER.to_string(), ToString::to_string);
        Self::new(text, severity)
    }

    /// Overwrite the previously rendered record instead of appending.
    #[must_use]
    pub fn replacing(mut self, replace_previous: bool) -> Self {
        self.replace_previous = replace_previous;
        self
    }

    pub(crate) fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Message body, possibly spanning several lines.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn replace_previous(&self) -> bool {
        self.replace_previous
    }

    /// Global enqueue order; zero until the record has been queued.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Split the body into visual lines.
    ///
    /// `\n` and `\r\n` both end a line. An empty body is a single empty line,
    /// and a trailing break yields a trailing empty line.
    pub fn visual_lines(&self) -> Vec<&str> {
        self.text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let record = LogRecord::new("hello", Severity::Info);
        assert_eq!(record.text(), "hello");
        assert_eq!(record.severity(), Severity::Info);
        assert!(!record.replace_previous());
        assert_eq!(record.sequence(), 0);
    }

    #[test]
    fn test_replacing() {
        let record = LogRecord::new("50%", Severity::Info).replacing(true);
        assert!(record.replace_previous());
    }

    #[test]
    fn test_from_lines_joins_with_separator() {
        let record = LogRecord::from_lines(["a", "b", "c"], "\n", Severity::Warning);
        assert_eq!(record.text(), "a\nb\nc");
        assert_eq!(record.severity(), Severity::Warning);
    }

    #[test]
    fn test_from_lines_empty() {
        let record = LogRecord::from_lines(Vec::<String>::new(), "\n", Severity::Info);
        assert_eq!(record.text(), "");
    }

    #[test]
    fn test_from_value_present() {
        let record = LogRecord::from_value(Some(&42), Severity::Info);
        assert_eq!(record.text(), "42");
    }

    #[test]
    fn test_from_value_absent_is_null() {
        let record = LogRecord::from_value::<i32>(None, Severity::Info);
        assert_eq!(record.text(), NULL_MARKER);
    }

    #[test]
    fn test_visual_lines_empty_text() {
        let record = LogRecord::new("", Severity::Info);
        assert_eq!(record.visual_lines(), vec![""]);
    }

    #[test]
    fn test_visual_lines_crlf() {
        let record = LogRecord::new("one\r\ntwo\nthree", Severity::Info);
        assert_eq!(record.visual_lines(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_visual_lines_trailing_break() {
        let record = LogRecord::new("done\n", Severity::Info);
        assert_eq!(record.visual_lines(), vec!["done", ""]);
    }
}
