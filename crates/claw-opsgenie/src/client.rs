//! Alert-service client used by the adapter.
//!
//! This module provides the [`AlertClient`] trait, the wire types of the
//! Opsgenie v2 create-alert call, and [`OpsgenieClient`], a blocking
//! reqwest-backed implementation.
//!
//! `OpsgenieClient` uses `reqwest::blocking`, which owns a private runtime.
//! It must not be called from a thread that is driving an async runtime.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AdapterError, ClientError};
use crate::types::{Priority, Team};

/// Path of the create-alert call, relative to the endpoint.
const ALERTS_PATH: &str = "/v2/alerts";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A team recipient of an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecipient {
    /// Recipient kind; always `"team"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Team name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Team id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl From<&Team> for TeamRecipient {
    fn from(team: &Team) -> Self {
        Self {
            kind: "team".to_string(),
            name: team.name.clone(),
            id: team.id.clone(),
        }
    }
}

/// Body of a create-alert request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    /// Alert message.
    pub message: String,
    /// Deduplication key.
    pub alias: String,
    /// Long-form description.
    pub description: String,
    /// Teams that receive the alert.
    pub responders: Vec<TeamRecipient>,
    /// Alert tags.
    pub tags: Vec<String>,
    /// Free-form key/value details.
    pub details: HashMap<String, String>,
    /// Entity the alert is about.
    pub entity: String,
    /// Where the alert came from.
    pub source: String,
    /// Alert priority.
    pub priority: Priority,
}

/// Acknowledgement returned by Opsgenie. Alert creation is asynchronous on
/// their side; `request_id` identifies the request for later lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertResponse {
    /// Human-readable result.
    #[serde(default)]
    pub result: String,
    /// Server-side processing time in seconds.
    #[serde(default)]
    pub took: f64,
    /// Request identifier.
    #[serde(default)]
    pub request_id: String,
}

/// A client able to create alerts.
///
/// Implement this trait to route alerts through a custom transport or to
/// capture them in tests.
pub trait AlertClient: Send + Sync + fmt::Debug {
    /// Creates an alert.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` if the alert could not be created.
    fn create(&self, request: &CreateAlertRequest) -> Result<CreateAlertResponse, ClientError>;
}

/// Blocking HTTP client for the Opsgenie Alert API.
#[derive(Clone)]
pub struct OpsgenieClient {
    api_key: String,
    endpoint: String,
    http: reqwest::blocking::Client,
}

impl fmt::Debug for OpsgenieClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpsgenieClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpsgenieClient {
    /// Creates a client bound to an API key and endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::ClientBuild` if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self, AdapterError> {
        Self::with_timeout(api_key, endpoint, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::ClientBuild` if the HTTP client cannot be built.
    pub fn with_timeout(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AdapterError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AdapterError::ClientBuild)?;

        Ok(Self {
            api_key: api_key.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Returns the endpoint, without a trailing slash.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn alerts_url(&self) -> String {
        format!("{}{ALERTS_PATH}", self.endpoint)
    }
}

impl AlertClient for OpsgenieClient {
    fn create(&self, request: &CreateAlertRequest) -> Result<CreateAlertResponse, ClientError> {
        let response = self
            .http
            .post(self.alerts_url())
            .header(reqwest::header::AUTHORIZATION, format!("GenieKey {}", self.api_key))
            .json(request)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), alias = %request.alias, "opsgenie accepted alert");

        if body.trim().is_empty() {
            return Ok(CreateAlertResponse::default());
        }
        Ok(serde_json::from_str(&body)?)
    }
}
