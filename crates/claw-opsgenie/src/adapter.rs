//! The alert adapter.
//!
//! [`AlertAdapter`] maps a [`LogEvent`] onto a [`CreateAlertRequest`] using
//! its validated defaults and the event's `ogh:` overrides, then submits the
//! request through its [`AlertClient`]. Each call is independent; nothing is
//! retried, buffered, or cached.

use std::collections::HashMap;

use tracing::debug;

use crate::client::{AlertClient, CreateAlertRequest, CreateAlertResponse, OpsgenieClient, TeamRecipient};
use crate::error::{AdapterError, Result};
use crate::overrides;
use crate::settings::AdapterSettings;
use crate::types::{AdapterConfig, LogEvent, Priority, Severity, ValidatedConfig};

/// Turns severe log events into Opsgenie alerts.
#[derive(Debug)]
pub struct AlertAdapter<C = OpsgenieClient> {
    client: C,
    config: ValidatedConfig,
}

impl AlertAdapter<OpsgenieClient> {
    /// Creates an adapter backed by an [`OpsgenieClient`].
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` for an empty API key, `MissingEndpoint`
    /// for an empty endpoint, `InvalidConfiguration` if the config fails
    /// validation, and `ClientBuild` if the HTTP client cannot be built.
    pub fn new(api_key: &str, endpoint: &str, config: AdapterConfig) -> Result<Self> {
        if api_key.is_empty() {
            return Err(AdapterError::MissingCredential);
        }
        if endpoint.is_empty() {
            return Err(AdapterError::MissingEndpoint);
        }
        let config = config.validate()?;
        let client = OpsgenieClient::new(api_key, endpoint)?;

        debug!(endpoint = %client.endpoint(), "opsgenie adapter ready");
        Ok(Self { client, config })
    }

    /// Creates an adapter from settings loaded at startup.
    ///
    /// # Errors
    ///
    /// Same as [`AlertAdapter::new`].
    pub fn from_settings(settings: AdapterSettings) -> Result<Self> {
        Self::new(&settings.api_key, &settings.endpoint, settings.config)
    }
}

impl<C: AlertClient> AlertAdapter<C> {
    /// Creates an adapter around an existing client.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::InvalidConfiguration` if the config fails validation.
    pub fn with_client(client: C, config: AdapterConfig) -> Result<Self> {
        Ok(Self {
            client,
            config: config.validate()?,
        })
    }

    /// Returns the validated configuration.
    #[must_use]
    pub const fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// The severities this adapter should be invoked for.
    ///
    /// The host decides which events reach [`AlertAdapter::handle`]; the
    /// adapter itself does not filter.
    #[must_use]
    pub const fn levels(&self) -> &'static [Severity] {
        &Severity::ALERT_TIER
    }

    /// Returns true if events at `level` should be handed to this adapter.
    #[must_use]
    pub fn accepts(&self, level: Severity) -> bool {
        self.levels().contains(&level)
    }

    /// Builds the alert for `event` and submits it.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::SubmissionFailed` carrying the client's error
    /// unchanged.
    pub fn handle(&self, event: &LogEvent) -> Result<CreateAlertResponse> {
        let request = self.build_request(event);
        debug!(alias = %request.alias, priority = %request.priority, "submitting opsgenie alert");
        Ok(self.client.create(&request)?)
    }

    /// Builds the alert for `event` without submitting it.
    #[must_use]
    pub fn build_request(&self, event: &LogEvent) -> CreateAlertRequest {
        CreateAlertRequest {
            message: event.message.clone(),
            alias: alias(event),
            description: description(event),
            responders: self.teams(),
            tags: self.tags(event),
            details: details(event),
            entity: self.entity(event),
            source: self.source(event),
            priority: self.priority(event),
        }
    }

    fn teams(&self) -> Vec<TeamRecipient> {
        self.config
            .default_teams()
            .iter()
            .map(TeamRecipient::from)
            .collect()
    }

    // Starts from a fresh copy so the shared defaults are never extended.
    fn tags(&self, event: &LogEvent) -> Vec<String> {
        let mut tags = self.config.default_tags().to_vec();
        if let Some(extra) = overrides::tags(event) {
            tags.extend_from_slice(extra);
        }
        tags
    }

    fn entity(&self, event: &LogEvent) -> String {
        overrides::entity(event)
            .unwrap_or_else(|| self.config.default_entity())
            .to_string()
    }

    fn source(&self, event: &LogEvent) -> String {
        overrides::source(event)
            .unwrap_or_else(|| self.config.default_source())
            .to_string()
    }

    fn priority(&self, event: &LogEvent) -> Priority {
        overrides::priority(event).unwrap_or_else(|| self.config.default_priority())
    }
}

/// The `ogh:alias` override, or the CRC-32 of the message as lowercase hex.
///
/// The checksum is a cheap, stable fingerprint, not a cryptographic one;
/// distinct messages may collide.
#[must_use]
pub fn alias(event: &LogEvent) -> String {
    match overrides::alias(event) {
        Some(alias) => alias.to_string(),
        None => format!("{:x}", crc32fast::hash(event.message.as_bytes())),
    }
}

/// The message, followed by the `error` field's text on a new line.
#[must_use]
pub fn description(event: &LogEvent) -> String {
    match overrides::error_text(event) {
        Some(err) => format!("{}\n{err}", event.message),
        None => event.message.clone(),
    }
}

/// Every field outside the override namespace, rendered as text.
#[must_use]
pub fn details(event: &LogEvent) -> HashMap<String, String> {
    event
        .fields
        .iter()
        .filter(|(key, _)| !overrides::is_override_key(key))
        .map(|(key, value)| (key.clone(), value.to_string()))
        .collect()
}
