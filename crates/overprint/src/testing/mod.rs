//! Testing utilities for console output
//!
//! Provides `TestConsole` for capturing output and `VirtualTerminal` for
//! checking what a terminal would actually show after in-place updates.

mod test_console;
mod virtual_terminal;

pub use test_console::TestConsole;
pub use virtual_terminal::VirtualTerminal;
