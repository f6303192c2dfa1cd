//! `tracing` integration.
//!
//! [`OpsgenieLayer`] is a `tracing-subscriber` layer that converts every
//! event in the adapter's alert tier into a [`LogEvent`] and hands it to
//! [`AlertAdapter::handle`].
//!
//! ```rust,no_run
//! use claw_opsgenie::{AdapterConfig, AlertAdapter, OpsgenieLayer, Priority, ENDPOINT_EU};
//! use tracing_subscriber::prelude::*;
//!
//! let config = AdapterConfig::new().tag("infra").priority(Priority::P2);
//! let adapter = AlertAdapter::new("api-key", ENDPOINT_EU, config).unwrap();
//!
//! tracing_subscriber::registry()
//!     .with(OpsgenieLayer::new(adapter))
//!     .init();
//!
//! let err = std::io::Error::other("disk at 99%");
//! tracing::error!(
//!     "ogh:priority" = "P1",
//!     "ogh:tags" = "disk,urgent",
//!     error = &err as &dyn std::error::Error,
//!     host = "db-1",
//!     "disk full"
//! );
//! ```
//!
//! `tracing` has no sequence values, so `ogh:tags` is read as a
//! comma-separated string. The `error` field only extends the description
//! when it is recorded as an error (`&err as &dyn Error`), not as `%err`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{warn, Event, Subscriber};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

use crate::adapter::AlertAdapter;
use crate::client::{AlertClient, OpsgenieClient};
use crate::error::AdapterError;
use crate::overrides::{is_override_key, OVERRIDE_TAGS};
use crate::settings::split_list;
use crate::types::{FieldValue, LogEvent, Severity};

/// Events from this crate never reach the adapter.
const SELF_TARGET: &str = "claw_opsgenie";

/// Name `tracing` gives the format-string message.
const MESSAGE_FIELD: &str = "message";

type ErrorHandler = Box<dyn Fn(&AdapterError) + Send + Sync>;

/// A tracing layer that turns error-tier events into Opsgenie alerts.
pub struct OpsgenieLayer<C = OpsgenieClient> {
    adapter: Arc<AlertAdapter<C>>,
    on_error: ErrorHandler,
}

impl<C: AlertClient> OpsgenieLayer<C> {
    /// Creates a layer that owns `adapter`.
    #[must_use]
    pub fn new(adapter: AlertAdapter<C>) -> Self {
        Self::from_shared(Arc::new(adapter))
    }

    /// Creates a layer around a shared adapter.
    #[must_use]
    pub fn from_shared(adapter: Arc<AlertAdapter<C>>) -> Self {
        Self {
            adapter,
            on_error: Box::new(log_submission_error),
        }
    }

    /// Replaces the handler called when an alert cannot be submitted.
    ///
    /// The default handler logs a warning.
    #[must_use]
    pub fn with_error_handler(
        mut self,
        handler: impl Fn(&AdapterError) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Box::new(handler);
        self
    }

    /// Returns the adapter.
    #[must_use]
    pub fn adapter(&self) -> &Arc<AlertAdapter<C>> {
        &self.adapter
    }
}

impl<C: fmt::Debug> fmt::Debug for OpsgenieLayer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpsgenieLayer")
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}

fn is_own_target(target: &str) -> bool {
    target == SELF_TARGET
        || target
            .strip_prefix(SELF_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

// Logged below the alert tier so it can never feed back into the layer.
fn log_submission_error(err: &AdapterError) {
    warn!(error = %err, "failed to create opsgenie alert");
}

impl<S, C> Layer<S> for OpsgenieLayer<C>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    C: AlertClient + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Severity::from(*metadata.level());
        if !self.adapter.accepts(level) || is_own_target(metadata.target()) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        let log_event = visitor.into_log_event(level);

        if let Err(err) = self.adapter.handle(&log_event) {
            (self.on_error)(&err);
        }
    }
}

/// Collects an event's message and fields.
#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: HashMap<String, FieldValue>,
}

impl EventVisitor {
    fn into_log_event(self, level: Severity) -> LogEvent {
        LogEvent {
            message: self.message,
            level,
            fields: self.fields,
        }
    }

    fn insert(&mut self, field: &Field, value: FieldValue) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for EventVisitor {
    // `%value` arrives here; overrides are read back as strings.
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let text = format!("{value:?}");
        if field.name() == MESSAGE_FIELD {
            self.message = text;
        } else if is_override_key(field.name()) {
            self.record_str(field, &text);
        } else {
            self.insert(field, FieldValue::Debug(text));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            MESSAGE_FIELD => self.message = value.to_string(),
            OVERRIDE_TAGS => self.insert(field, FieldValue::List(split_list(value))),
            _ => self.insert(field, FieldValue::Str(value.to_string())),
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, FieldValue::error(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, FieldValue::I64(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, FieldValue::U64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, FieldValue::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, FieldValue::Bool(value));
    }
}
