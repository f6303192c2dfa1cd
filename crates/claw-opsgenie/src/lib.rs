//! Opsgenie alerting for severe Clawbernetes log events.
//!
//! `claw-opsgenie` converts log events at the error tier into Opsgenie
//! create-alert requests and submits them synchronously, one request per event.
//!
//! # Features
//!
//! - **Static defaults**: teams, tags, entity, source, and priority per adapter
//! - **Per-event overrides**: `ogh:`-prefixed fields adjust a single alert
//! - **Stable aliases**: CRC-32 of the message when no alias is given
//! - **tracing integration**: [`OpsgenieLayer`] plugs into `tracing-subscriber`
//!
//! # Example
//!
//! ```rust
//! use claw_opsgenie::{
//!     AdapterConfig, AlertAdapter, LogEvent, Priority, Severity, OVERRIDE_TAGS, ENDPOINT_US,
//! };
//!
//! let config = AdapterConfig::new()
//!     .team("sre")
//!     .tag("infra")
//!     .source("svc-a")
//!     .priority(Priority::P1);
//! let adapter = AlertAdapter::new("api-key", ENDPOINT_US, config).unwrap();
//!
//! let event = LogEvent::new(Severity::Error, "disk full")
//!     .with_field("host", "db-1")
//!     .with_field(OVERRIDE_TAGS, vec!["urgent"]);
//!
//! let request = adapter.build_request(&event);
//! assert_eq!(request.tags, vec!["infra", "urgent"]);
//! assert_eq!(request.priority, Priority::P1);
//! ```
//!
//! # Overrides
//!
//! | Field | Effect |
//! |---|---|
//! | `ogh:alias` | replaces the computed alias |
//! | `ogh:source` | replaces the default source |
//! | `ogh:entity` | replaces the default entity |
//! | `ogh:tags` | appended to the default tags |
//! | `ogh:priority` | replaces the default priority when it is P1 to P5 |
//!
//! Overrides of the wrong type are ignored and the default applies.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod adapter;
pub mod client;
pub mod error;
pub mod layer;
pub mod overrides;
pub mod settings;
pub mod types;

/// Opsgenie API base URL in Europe.
pub const ENDPOINT_EU: &str = "https://api.eu.opsgenie.com";
/// Opsgenie API base URL in the USA.
pub const ENDPOINT_US: &str = "https://api.opsgenie.com";

// Re-export main types at crate root
pub use adapter::AlertAdapter;
pub use client::{AlertClient, CreateAlertRequest, CreateAlertResponse, OpsgenieClient, TeamRecipient};
pub use error::{AdapterError, ClientError, Result};
pub use layer::OpsgenieLayer;
pub use overrides::{
    ERROR_FIELD, OVERRIDE_ALIAS, OVERRIDE_ENTITY, OVERRIDE_PREFIX, OVERRIDE_PRIORITY,
    OVERRIDE_SOURCE, OVERRIDE_TAGS,
};
pub use settings::AdapterSettings;
pub use types::{AdapterConfig, FieldValue, LogEvent, Priority, Severity, Team, ValidatedConfig};
