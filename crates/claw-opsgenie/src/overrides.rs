//! Reserved field names that override adapter defaults per event.
//!
//! Any field whose name starts with [`OVERRIDE_PREFIX`] is configuration for
//! the adapter, not alert detail. Each accessor returns `None` when the field
//! is missing or holds a value of the wrong type; callers fall back to the
//! configured default in both cases.

use crate::types::{FieldValue, LogEvent, Priority};

/// Prefix of every override field. `ogh` stands for "Opsgenie hook".
pub const OVERRIDE_PREFIX: &str = "ogh:";
/// Replaces the computed alias.
pub const OVERRIDE_ALIAS: &str = "ogh:alias";
/// Replaces the default source.
pub const OVERRIDE_SOURCE: &str = "ogh:source";
/// Appended to the default tags; never replaces them.
pub const OVERRIDE_TAGS: &str = "ogh:tags";
/// Replaces the default entity.
pub const OVERRIDE_ENTITY: &str = "ogh:entity";
/// Replaces the default priority when it holds P1 to P5.
pub const OVERRIDE_PRIORITY: &str = "ogh:priority";

/// Field whose error text is appended to the alert description.
pub const ERROR_FIELD: &str = "error";

/// Returns true if `key` belongs to the override namespace.
#[must_use]
pub fn is_override_key(key: &str) -> bool {
    key.starts_with(OVERRIDE_PREFIX)
}

fn string_field<'a>(event: &'a LogEvent, key: &str) -> Option<&'a str> {
    match event.field(key)? {
        FieldValue::Str(s) => Some(s.as_str()),
        _ => None,
    }
}

/// `ogh:alias`, if it holds a string.
#[must_use]
pub fn alias(event: &LogEvent) -> Option<&str> {
    string_field(event, OVERRIDE_ALIAS)
}

/// `ogh:source`, if it holds a string.
#[must_use]
pub fn source(event: &LogEvent) -> Option<&str> {
    string_field(event, OVERRIDE_SOURCE)
}

/// `ogh:entity`, if it holds a string.
#[must_use]
pub fn entity(event: &LogEvent) -> Option<&str> {
    string_field(event, OVERRIDE_ENTITY)
}

/// `ogh:tags`, if it holds a list of strings.
#[must_use]
pub fn tags(event: &LogEvent) -> Option<&[String]> {
    match event.field(OVERRIDE_TAGS)? {
        FieldValue::List(items) => Some(items.as_slice()),
        _ => None,
    }
}

/// `ogh:priority`, if it holds a priority or a string spelling one.
///
/// Anything else, including `"P9"` or the integer `1`, is ignored.
#[must_use]
pub fn priority(event: &LogEvent) -> Option<Priority> {
    match event.field(OVERRIDE_PRIORITY)? {
        FieldValue::Priority(p) => Some(*p),
        FieldValue::Str(s) => s.parse().ok(),
        _ => None,
    }
}

/// The text of the `error` field, if it holds an error.
#[must_use]
pub fn error_text(event: &LogEvent) -> Option<&str> {
    match event.field(ERROR_FIELD)? {
        FieldValue::Error(text) => Some(text.as_str()),
        _ => None,
    }
}
