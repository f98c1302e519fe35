//! Overwrite protocol: turning a record into a frame.
//!
//! Planning is pure. Given the geometry of the previously rendered record,
//! [`plan_frame`] decides whether the new record overwrites or appends, pads
//! its lines so no stale glyphs survive, and extends it with blank lines when
//! the previous record was taller. The returned [`RenderState`] is what the
//! render loop keeps once the frame has been written.

use crate::config::OverwriteStrategy;
use crate::level::Severity;
use crate::record::LogRecord;

/// Geometry of the most recently rendered record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderState {
    /// Widest visual line, in characters, before padding.
    pub last_rendered_width: usize,
    /// Number of visual lines, before any blank-line extension.
    pub last_rendered_line_count: usize,
}

impl RenderState {
    /// True until the first record has been rendered.
    pub fn is_empty(&self) -> bool {
        self.last_rendered_line_count == 0
    }
}

/// Everything needed to put one record on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Lines to move the cursor up before writing (0 = append).
    pub move_up: usize,
    /// Lines to write, already padded and extended.
    pub lines: Vec<String>,
    /// Severity of the source record, used for coloring.
    pub severity: Severity,
    /// Sequence number of the source record.
    pub sequence: u64,
}

impl Frame {
    /// Whether this frame rewrites previously rendered lines.
    pub fn overwrites(&self) -> bool {
        self.move_up > 0
    }
}

/// Number of characters in a line, the unit of width bookkeeping.
pub fn line_width(line: &str) -> usize {
    line.chars().count()
}

fn pad_to(line: &str, width: usize) -> String {
    let mut padded = String::with_capacity(line.len() + width);
    padded.push_str(line);
    for _ in line_width(line)..width {
        padded.push(' ');
    }
    padded
}

/// Plan the frame for `record` and the state that follows it.
///
/// With [`OverwriteStrategy::Append`] nothing is ever rewritten, so
/// replace-previous records are appended unpadded; the state still tracks
/// them so that a later strategy switch stays consistent.
pub fn plan_frame(
    record: &LogRecord,
    previous: RenderState,
    strategy: OverwriteStrategy,
) -> (Frame, RenderState) {
    let natural = record.visual_lines();
    let next = RenderState {
        last_rendered_width: natural.iter().map(|line| line_width(line)).max().unwrap_or(0),
        last_rendered_line_count: natural.len(),
    };

    let overwrite = record.replace_previous()
        && !previous.is_empty()
        && strategy == OverwriteStrategy::Ansi;

    let lines = if overwrite {
        let width = previous.last_rendered_width;
        let mut lines: Vec<String> = natural.iter().map(|line| pad_to(line, width)).collect();
        while lines.len() < previous.last_rendered_line_count {
            lines.push(" ".repeat(width));
        }
        lines
    } else {
        natural.iter().map(|line| (*line).to_string()).collect()
    };

    let frame = Frame {
        move_up: if overwrite { previous.last_rendered_line_count } else { 0 },
        lines,
        severity: record.severity(),
        sequence: record.sequence(),
    };
    (frame, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(width: usize, lines: usize) -> RenderState {
        RenderState {
            last_rendered_width: width,
            last_rendered_line_count: lines,
        }
    }

    fn record(text: &str, replace: bool) -> LogRecord {
        LogRecord::new(text, Severity::Info).replacing(replace)
    }

    #[test]
    fn test_first_record_appends() {
        let (frame, next) = plan_frame(&record("hello", false), RenderState::default(), OverwriteStrategy::Ansi);
        assert_eq!(frame.move_up, 0);
        assert_eq!(frame.lines, vec!["hello"]);
        assert_eq!(next, state(5, 1));
    }

    #[test]
    fn test_replace_without_previous_is_append() {
        let (frame, next) = plan_frame(&record("abc", true), RenderState::default(), OverwriteStrategy::Ansi);
        assert!(!frame.overwrites());
        assert_eq!(frame.lines, vec!["abc"]);
        assert_eq!(next, state(3, 1));
    }

    #[test]
    fn test_replace_pads_to_previous_width() {
        let previous = state(line_width("Loading... 100%"), 1);
        let (frame, next) = plan_frame(&record("Done", true), previous, OverwriteStrategy::Ansi);
        assert_eq!(frame.move_up, 1);
        assert_eq!(frame.lines, vec![format!("Done{}", " ".repeat(11))]);
        assert_eq!(next, state(4, 1));
    }

    #[test]
    fn test_replace_with_wider_line_is_not_truncated() {
        let previous = state(line_width("Loading... 0%"), 1);
        let (frame, _) = plan_frame(&record("Loading... 100%", true), previous, OverwriteStrategy::Ansi);
        assert_eq!(frame.lines, vec!["Loading... 100%"]);
        assert!(line_width(&frame.lines[0]) >= line_width("Loading... 0%"));
    }

    #[test]
    fn test_shrinking_multiline_extends_with_blanks() {
        let previous = state(6, 3);
        let (frame, next) = plan_frame(&record("one", true), previous, OverwriteStrategy::Ansi);
        assert_eq!(frame.move_up, 3);
        assert_eq!(frame.lines, vec!["one   ", "      ", "      "]);
        // natural geometry, not the extended one
        assert_eq!(next, state(3, 1));
    }

    #[test]
    fn test_growing_multiline_is_not_extended() {
        let previous = state(2, 1);
        let (frame, next) = plan_frame(&record("a\nbb\nccc", true), previous, OverwriteStrategy::Ansi);
        assert_eq!(frame.move_up, 1);
        assert_eq!(frame.lines, vec!["a ", "bb", "ccc"]);
        assert_eq!(next, state(3, 3));
    }

    #[test]
    fn test_non_replace_ignores_previous() {
        let (frame, _) = plan_frame(&record("B", false), state(10, 4), OverwriteStrategy::Ansi);
        assert_eq!(frame.move_up, 0);
        assert_eq!(frame.lines, vec!["B"]);
    }

    #[test]
    fn test_append_strategy_never_overwrites() {
        let (frame, next) = plan_frame(&record("x", true), state(10, 2), OverwriteStrategy::Append);
        assert_eq!(frame.move_up, 0);
        assert_eq!(frame.lines, vec!["x"]);
        assert_eq!(next, state(1, 1));
    }

    #[test]
    fn test_empty_text_is_one_line() {
        let (frame, next) = plan_frame(&record("", false), RenderState::default(), OverwriteStrategy::Ansi);
        assert_eq!(frame.lines, vec![""]);
        assert_eq!(next, state(0, 1));
    }

    #[test]
    fn test_width_counts_characters() {
        assert_eq!(line_width("héllo"), 5);
        let previous = state(line_width("héllo wörld"), 1);
        let (frame, _) = plan_frame(&record("ö", true), previous, OverwriteStrategy::Ansi);
        assert_eq!(line_width(&frame.lines[0]), 11);
    }

    #[test]
    fn test_planning_does_not_touch_record() {
        let original = record("keep me", true);
        let copy = original.clone();
        let _ = plan_frame(&original, state(20, 2), OverwriteStrategy::Ansi);
        assert_eq!(original, copy);
    }
}
