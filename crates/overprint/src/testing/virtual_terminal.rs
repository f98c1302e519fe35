//! A minimal screen model for asserting on in-place updates.
//!
//! Understands exactly what the render loop emits: printable characters,
//! `\r`, `\n`, cursor-up (`ESC [ n A`) and erase-line (`ESC [ 2 K`). SGR
//! color sequences and any other CSI sequence are ignored. `\n` behaves like
//! a cooked-mode terminal newline (down one row, back to column zero).

/// Final visible state of a byte stream replayed onto a screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualTerminal {
    rows: Vec<Vec<char>>,
    row: usize,
    col: usize,
}

impl VirtualTerminal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay a complete byte stream onto a fresh screen.
    #[must_use]
    pub fn replay(bytes: &[u8]) -> Self {
        let mut term = Self::new();
        term.feed(&String::from_utf8_lossy(bytes));
        term
    }

    /// Cursor position as `(row, column)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Apply more output to the screen.
    pub fn feed(&mut self, text: &str) {
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' => self.col = 0,
                '\n' => {
                    self.row += 1;
                    self.col = 0;
                }
                '\x1b' => {
                    if chars.peek() != Some(&'[') {
                        continue;
                    }
                    chars.next();
                    let mut params = String::new();
                    let mut command = None;
                    for c in chars.by_ref() {
                        if c.is_ascii_digit() || c == ';' {
                            params.push(c);
                        } else {
                            command = Some(c);
                            break;
                        }
                    }
                    self.apply_csi(&params, command);
                }
                _ => self.put(ch),
            }
        }
    }

    fn apply_csi(&mut self, params: &str, command: Option<char>) {
        match command {
            Some('A') => {
                let n = params.parse::<usize>().unwrap_or(1).max(1);
                self.row = self.row.saturating_sub(n);
            }
            Some('K') if params == "2" => {
                if let Some(row) = self.rows.get_mut(self.row) {
                    row.clear();
                }
            }
            _ => {}
        }
    }

    fn put(&mut self, ch: char) {
        while self.rows.len() <= self.row {
            self.rows.push(Vec::new());
        }
        let row = &mut self.rows[self.row];
        while row.len() < self.col {
            row.push(' ');
        }
        if self.col < row.len() {
            row[self.col] = ch;
        } else {
            row.push(ch);
        }
        self.col += 1;
    }

    /// Visible lines, right-trimmed, without trailing blank rows.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .rows
            .iter()
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect();
        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines
    }

    /// Visible row `index` exactly as drawn, including padding spaces.
    pub fn raw_row(&self, index: usize) -> Option<String> {
        self.rows.get(index).map(|row| row.iter().collect())
    }
}
