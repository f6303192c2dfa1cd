//! Core types for the Opsgenie adapter.
//!
//! This module provides:
//! - [`Priority`]: Opsgenie alert priority (P1 to P5)
//! - [`Team`]: A team recipient for created alerts
//! - [`AdapterConfig`] / [`ValidatedConfig`]: Static defaults applied to every alert
//! - [`Severity`]: Log severity, including the alerting tier
//! - [`FieldValue`] / [`LogEvent`]: The log event consumed by the adapter

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, Result};

/// Opsgenie alert priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    /// Critical.
    P1,
    /// High.
    P2,
    /// Moderate.
    #[default]
    P3,
    /// Low.
    P4,
    /// Informational.
    P5,
}

impl Priority {
    /// All valid priorities, most urgent first.
    pub const ALL: [Self; 5] = [Self::P1, Self::P2, Self::P3, Self::P4, Self::P5];

    /// Returns the priority as Opsgenie spells it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::P4 => "P4",
            Self::P5 => "P5",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AdapterError::InvalidConfiguration {
                reason: format!("invalid priority: {s}"),
            })
    }
}

/// A team that receives alerts, identified by name or by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    /// Team name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Team id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Team {
    /// Creates a team recipient identified by name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            id: None,
        }
    }

    /// Creates a team recipient identified by id.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            name: None,
            id: Some(id.into()),
        }
    }
}

impl From<&str> for Team {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

/// Default values applied to every alert the adapter creates.
///
/// `default_priority` is kept as raw text until [`AdapterConfig::validate`]
/// runs; an empty value falls back to P3.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Teams notified for every alert.
    pub default_teams: Vec<Team>,
    /// Tags attached to every alert. Event tags are appended to these.
    pub default_tags: Vec<String>,
    /// Entity used when the event does not override it.
    pub default_entity: String,
    /// Source used when the event does not override it.
    pub default_source: String,
    /// Priority used when the event does not override it.
    pub default_priority: String,
}

impl AdapterConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a default team.
    #[must_use]
    pub fn team(mut self, team: impl Into<Team>) -> Self {
        self.default_teams.push(team.into());
        self
    }

    /// Adds a default tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.default_tags.push(tag.into());
        self
    }

    /// Sets the default entity.
    #[must_use]
    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.default_entity = entity.into();
        self
    }

    /// Sets the default source.
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.default_source = source.into();
        self
    }

    /// Sets the default priority.
    #[must_use]
    pub fn priority(mut self, priority: impl fmt::Display) -> Self {
        self.default_priority = priority.to_string();
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::InvalidConfiguration` if the priority is set
    /// but is not one of P1 to P5.
    pub fn validate(self) -> Result<ValidatedConfig> {
        let default_priority = if self.default_priority.is_empty() {
            Priority::default()
        } else {
            self.default_priority.parse()?
        };

        Ok(ValidatedConfig {
            default_teams: self.default_teams,
            default_tags: self.default_tags,
            default_entity: self.default_entity,
            default_source: self.default_source,
            default_priority,
        })
    }
}

/// An [`AdapterConfig`] that passed validation. Read-only from here on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    default_teams: Vec<Team>,
    default_tags: Vec<String>,
    default_entity: String,
    default_source: String,
    default_priority: Priority,
}

impl ValidatedConfig {
    /// Default teams.
    #[must_use]
    pub fn default_teams(&self) -> &[Team] {
        &self.default_teams
    }

    /// Default tags.
    #[must_use]
    pub fn default_tags(&self) -> &[String] {
        &self.default_tags
    }

    /// Default entity.
    #[must_use]
    pub fn default_entity(&self) -> &str {
        &self.default_entity
    }

    /// Default source.
    #[must_use]
    pub fn default_source(&self) -> &str {
        &self.default_source
    }

    /// Default priority.
    #[must_use]
    pub const fn default_priority(&self) -> Priority {
        self.default_priority
    }
}

/// Log severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Finest-grained tracing output.
    Trace,
    /// Debugging information.
    Debug,
    /// General information.
    Info,
    /// Warning conditions.
    Warn,
    /// Error conditions.
    Error,
    /// The process is about to exit.
    Fatal,
    /// The process is about to panic.
    Panic,
}

impl Severity {
    /// The levels an alert adapter is invoked for.
    pub const ALERT_TIER: [Self; 3] = [Self::Error, Self::Fatal, Self::Panic];

    /// Returns the severity as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Self::Trace,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

/// A value attached to a log event field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A string.
    Str(String),
    /// A list of strings.
    List(Vec<String>),
    /// An alert priority.
    Priority(Priority),
    /// A signed integer.
    I64(i64),
    /// An unsigned integer.
    U64(u64),
    /// A float.
    F64(f64),
    /// A boolean.
    Bool(bool),
    /// An error, kept as its display text.
    Error(String),
    /// Any other value, already formatted with `Debug`.
    Debug(String),
}

impl FieldValue {
    /// Wraps an error's display text.
    #[must_use]
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::Error(err.to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) | Self::Error(s) | Self::Debug(s) => f.write_str(s),
            Self::List(items) => write!(f, "[{}]", items.join(" ")),
            Self::Priority(p) => write!(f, "{p}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Priority> for FieldValue {
    fn from(p: Priority) -> Self {
        Self::Priority(p)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// A structured log event handed to the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    /// The log message.
    pub message: String,
    /// Severity of the event.
    pub level: Severity,
    /// Structured fields attached to the event.
    pub fields: HashMap<String, FieldValue>,
}

impl LogEvent {
    /// Creates an event with no fields.
    #[must_use]
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            fields: HashMap::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Attaches an error under the `error` field.
    #[must_use]
    pub fn with_error(mut self, err: &(dyn std::error::Error + 'static)) -> Self {
        self.fields
            .insert(crate::overrides::ERROR_FIELD.to_string(), FieldValue::error(err));
        self
    }

    /// Returns a field by name.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}
