//! TestConsole for capturing output in tests
//!
//! Provides a writer that captures everything the render loop emits, so
//! tests can assert on plain lines, raw ANSI output, or the final screen.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use strip_ansi_escapes::strip;

use crate::config::{ConsoleConfig, OverwriteStrategy};
use crate::console::ConsoleLogger;
use crate::testing::VirtualTerminal;

/// Captures console output for assertions
///
/// Clones share the same buffer. Hand [`writer`](TestConsole::writer) (or
/// [`logger`](TestConsole::logger)) to the code under test, then use
/// `output()`, `screen()`, `contains()` and the assertion methods.
#[derive(Clone, Default)]
pub struct TestConsole {
    buffer: Arc<Mutex<TestBuffer>>,
}

#[derive(Debug, Default)]
struct TestBuffer {
    bytes: Vec<u8>,
    fail_writes: bool,
}

impl TestConsole {
    /// Create a new, empty capture buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer that appends into this console's buffer
    #[must_use]
    pub fn writer(&self) -> Box<dyn Write + Send> {
        Box::new(BufferWriter(Arc::clone(&self.buffer)))
    }

    /// A logger rendering into this console with in-place updates enabled
    /// and colors disabled
    #[must_use]
    pub fn logger(&self, config: ConsoleConfig) -> ConsoleLogger {
        let config = config.force_color(false).with_strategy(OverwriteStrategy::Ansi);
        ConsoleLogger::with_writer(self.writer(), config)
    }

    /// Make subsequent writes fail with `BrokenPipe` (or succeed again)
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TestBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything written so far, escapes included
    #[must_use]
    pub fn raw_bytes(&self) -> Vec<u8> {
        self.lock().bytes.clone()
    }

    /// Raw output split into lines (ANSI codes preserved)
    #[must_use]
    pub fn raw_output(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.raw_bytes())
            .lines()
            .map(String::from)
            .collect()
    }

    /// Written lines with ANSI codes stripped, in write order
    #[must_use]
    pub fn output(&self) -> Vec<String> {
        let stripped = strip(self.raw_bytes());
        String::from_utf8_lossy(&stripped)
            .lines()
            .map(|line| line.trim_start_matches('\r').to_string())
            .collect()
    }

    /// Get output as a single string
    #[must_use]
    pub fn output_string(&self) -> String {
        self.output().join("\n")
    }

    /// The visible screen after replaying all output
    #[must_use]
    pub fn terminal(&self) -> VirtualTerminal {
        VirtualTerminal::replay(&self.raw_bytes())
    }

    /// Visible lines after replaying all output
    #[must_use]
    pub fn screen(&self) -> Vec<String> {
        self.terminal().lines()
    }

    /// Check if output contains a string (case-insensitive)
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        let output = self.output_string().to_lowercase();
        output.contains(&needle.to_lowercase())
    }

    /// Check if output matches a regex pattern
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        match regex::Regex::new(pattern) {
            Ok(re) => re.is_match(&self.output_string()),
            Err(_) => false,
        }
    }

    /// Assert that output contains a string
    ///
    /// # Panics
    ///
    /// Panics if the output does not contain the needle string.
    pub fn assert_contains(&self, needle: &str) {
        assert!(
            self.contains(needle),
            "Output did not contain '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert that output does NOT contain a string
    ///
    /// # Panics
    ///
    /// Panics if the output contains the needle string.
    pub fn assert_not_contains(&self, needle: &str) {
        assert!(
            !self.contains(needle),
            "Output unexpectedly contained '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert the visible screen has exactly these lines
    ///
    /// # Panics
    ///
    /// Panics if the screen differs.
    pub fn assert_screen(&self, expected: &[&str]) {
        let screen = self.screen();
        assert_eq!(
            screen, expected,
            "Screen mismatch. Raw output:\n{:?}",
            String::from_utf8_lossy(&self.raw_bytes())
        );
    }

    /// Assert output has specific number of written lines
    ///
    /// # Panics
    ///
    /// Panics if the line count doesn't match expected.
    pub fn assert_line_count(&self, expected: usize) {
        let actual = self.output().len();
        assert_eq!(
            actual, expected,
            "Expected {} lines but got {}. Actual output:\n{}",
            expected, actual, self.output_string()
        );
    }

    /// Clear the buffer
    pub fn clear(&self) {
        self.lock().bytes.clear();
    }
}

impl std::fmt::Debug for TestConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestConsole")
            .field("bytes", &self.lock().bytes.len())
            .finish()
    }
}

/// Writer that captures to a buffer
struct BufferWriter(Arc<Mutex<TestBuffer>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if buffer.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "test console closed"));
        }
        buffer.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
