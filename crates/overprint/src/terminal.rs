//! Terminal control channel.
//!
//! [`TerminalWriter`] owns the output stream and turns a planned
//! [`Frame`] into bytes: optional cursor repositioning, per-line erase,
//! severity color, and line terminators. A frame is written in full and
//! flushed once, so a terminal never shows half of it.

use std::fmt;
use std::io::{self, Write};

use console::Term;

use crate::config::{LineEnding, OutputTarget, OverwriteStrategy};
use crate::detection::TerminalCapabilities;
use crate::error::RenderError;
use crate::render::Frame;

/// Erase the entire current line.
pub const ERASE_LINE: &str = "\x1b[2K";
/// Return to column zero.
pub const CARRIAGE_RETURN: &str = "\r";

/// Move the cursor up `n` lines.
#[must_use]
pub fn cursor_up(n: usize) -> String {
    format!("\x1b[{n}A")
}

/// Writes frames to a byte stream.
pub struct TerminalWriter {
    out: Box<dyn Write + Send>,
    capabilities: TerminalCapabilities,
    line_ending: LineEnding,
}

impl TerminalWriter {
    /// Wrap an arbitrary writer.
    #[must_use]
    pub fn new(
        out: Box<dyn Write + Send>,
        capabilities: TerminalCapabilities,
        line_ending: LineEnding,
    ) -> Self {
        Self {
            out,
            capabilities,
            line_ending,
        }
    }

    /// Open a buffered handle on a standard stream.
    #[must_use]
    pub fn for_target(
        target: OutputTarget,
        capabilities: TerminalCapabilities,
        line_ending: LineEnding,
    ) -> Self {
        let term = match target {
            OutputTarget::Stdout => Term::buffered_stdout(),
            OutputTarget::Stderr => Term::buffered_stderr(),
        };
        Self::new(Box::new(term), capabilities, line_ending)
    }

    pub fn capabilities(&self) -> TerminalCapabilities {
        self.capabilities
    }

    pub fn strategy(&self) -> OverwriteStrategy {
        self.capabilities.overwrite
    }

    /// Encode a frame without writing it.
    #[must_use]
    pub fn encode(&self, frame: &Frame) -> String {
        let ansi = self.capabilities.overwrite == OverwriteStrategy::Ansi;
        let style = if self.capabilities.color {
            frame.severity.style()
        } else {
            None
        };

        let mut buf = String::new();
        if ansi && frame.overwrites() {
            buf.push_str(&cursor_up(frame.move_up));
            buf.push_str(CARRIAGE_RETURN);
        }
        for line in &frame.lines {
            if ansi && frame.overwrites() {
                buf.push_str(ERASE_LINE);
            }
            // Style resets only when a color was applied; Info writes no escapes.
            match &style {
                Some(style) => buf.push_str(&style.apply_to(line).to_string()),
                None => buf.push_str(line),
            }
            buf.push_str(self.line_ending.as_str());
        }
        buf
    }

    /// Write and flush one frame.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), RenderError> {
        let bytes = self.encode(frame);
        self.out
            .write_all(bytes.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|err| RenderError::new(frame.sequence, err))
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl fmt::Debug for TerminalWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalWriter")
            .field("capabilities", &self.capabilities)
            .field("line_ending", &self.line_ending)
            .finish_non_exhaustive()
    }
}
