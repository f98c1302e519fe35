//! Tracing subscriber integration.
//!
//! Provides a tracing `Layer` and builder that queue events on a
//! [`ConsoleLogger`] instead of formatting them directly.

use std::fmt;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

use crate::console::ConsoleLogger;
use crate::level::Severity;
use crate::record::LogRecord;

/// A tracing layer that queues events on a console logger.
pub struct ConsoleLayer {
    console: Arc<ConsoleLogger>,
    show_targets: bool,
}

impl ConsoleLayer {
    #[must_use]
    pub fn new(console: Arc<ConsoleLogger>, show_targets: bool) -> Self {
        Self {
            console,
            show_targets,
        }
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl FieldCollector {
    fn record_value(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            if self.message.is_none() {
                self.message = Some(value);
            }
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if super::is_internal_target(metadata.target()) {
            return;
        }

        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<String> = scope.from_root().map(|span| span.name().to_string()).collect();
            if !spans.is_empty() {
                collector.fields.push(("span".to_string(), spans.join("::")));
            }
        }

        let message = collector
            .message
            .unwrap_or_else(|| metadata.name().to_string());
        let target = self.show_targets.then(|| metadata.target());
        let text = super::format_bridged(target, &message, &collector.fields);

        self.console
            .submit(LogRecord::new(text, Severity::from(*metadata.level())));
    }
}

/// Builder for a tracing subscriber that renders through a console logger.
pub struct ConsoleSubscriberBuilder {
    console: Arc<ConsoleLogger>,
    show_targets: bool,
    level_filter: LevelFilter,
}

impl ConsoleSubscriberBuilder {
    /// Create a new builder with defaults.
    #[must_use]
    pub fn new(console: Arc<ConsoleLogger>) -> Self {
        Self {
            console,
            show_targets: false,
            level_filter: LevelFilter::INFO,
        }
    }

    /// Toggle target/module prefixes.
    #[must_use]
    pub fn with_targets(mut self, show: bool) -> Self {
        self.show_targets = show;
        self
    }

    /// Set the minimum tracing level.
    #[must_use]
    pub fn with_level_filter(mut self, filter: LevelFilter) -> Self {
        self.level_filter = filter;
        self
    }

    /// Build the subscriber without installing it.
    #[must_use]
    pub fn build(self) -> impl Subscriber + Send + Sync {
        let layer = ConsoleLayer::new(self.console, self.show_targets);
        tracing_subscriber::registry()
            .with(self.level_filter)
            .with(layer)
    }

    /// Build and install as the global subscriber.
    pub fn init(self) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
        tracing::subscriber::set_global_default(self.build())
    }
}
