#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod console;
pub mod detection;
pub mod error;
pub mod global;
pub mod level;
pub mod logging; // `log` / `tracing` bridges and internal targets
pub mod queue;
pub mod record;
pub mod render; // Overwrite protocol (pure frame planning)
pub mod terminal;
pub mod testing; // Test utilities
pub mod worker;

pub use config::{ConsoleConfig, LineEnding, OutputTarget, OverwriteStrategy};
pub use console::ConsoleLogger;
pub use detection::{DisplayContext, TerminalCapabilities};
pub use error::{ConsoleError, RenderError};
pub use level::Severity;
pub use record::LogRecord;
pub use worker::WorkerState;
