//! Integration with the `log` and `tracing` facades.
//!
//! - [`ConsoleLogBridge`] - a `log` crate logger that queues records on a
//!   [`ConsoleLogger`](crate::ConsoleLogger)
//! - [`ConsoleLayer`] - a `tracing_subscriber` layer doing the same for
//!   tracing events
//!
//! The crate's own diagnostics go through the `log` facade under the
//! [`targets`] below. Both bridges ignore those targets so that a failing
//! render can never feed records back into its own queue.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use overprint::{ConsoleConfig, ConsoleLogger};
//! use overprint::logging::ConsoleLogBridge;
//!
//! let console = Arc::new(ConsoleLogger::new(ConsoleConfig::from_env()));
//! ConsoleLogBridge::builder(console).with_targets(true).init()?;
//! log::info!("flows through the render queue");
//! ```

mod logger;
mod subscriber;

pub use logger::{ConsoleLogBridge, ConsoleLogBridgeBuilder};
pub use subscriber::{ConsoleLayer, ConsoleSubscriberBuilder};

/// Log targets used by this crate's own diagnostics.
pub mod targets {
    /// Root target; records under it are never bridged back into a console.
    pub const OVERPRINT: &str = "overprint";

    /// Handle lifecycle.
    pub const CONSOLE: &str = "overprint::console";

    /// Render worker start, drain and stop.
    pub const WORKER: &str = "overprint::worker";

    /// Frame write failures.
    pub const RENDER: &str = "overprint::render";

    /// Queue operations.
    pub const QUEUE: &str = "overprint::queue";

    /// Configuration parsing.
    pub const CONFIG: &str = "overprint::config";
}

/// Whether a record from `target` originates inside this crate.
pub(crate) fn is_internal_target(target: &str) -> bool {
    target == targets::OVERPRINT
        || target
            .strip_prefix(targets::OVERPRINT)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// Render a bridged message as a single record body.
pub(crate) fn format_bridged(target: Option<&str>, message: &str, fields: &[(String, String)]) -> String {
    let mut text = String::new();
    if let Some(target) = target {
        text.push_str(target);
        text.push_str(": ");
    }
    text.push_str(message);
    for (key, value) in fields {
        text.push(' ');
        text.push_str(key);
        text.push('=');
        text.push_str(value);
    }
    text
}
