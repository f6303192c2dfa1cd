//! Error types for the claw-opsgenie crate.

use thiserror::Error;

/// Errors raised while building the adapter or submitting an alert.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The Opsgenie API key was empty.
    #[error("api key must be specified")]
    MissingCredential,

    /// The Opsgenie endpoint was empty.
    #[error("endpoint must be specified")]
    MissingEndpoint,

    /// The adapter configuration failed validation.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// The reason the configuration is invalid.
        reason: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The alert client rejected or failed the create call.
    #[error(transparent)]
    SubmissionFailed(#[from] ClientError),
}

/// Errors returned by an [`AlertClient`](crate::client::AlertClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Opsgenie answered with a non-success status.
    #[error("opsgenie returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// Request or response (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Any other failure reported by a custom client.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_missing_credential() {
        assert_eq!(
            AdapterError::MissingCredential.to_string(),
            "api key must be specified"
        );
    }

    #[test]
    fn error_display_missing_endpoint() {
        assert_eq!(
            AdapterError::MissingEndpoint.to_string(),
            "endpoint must be specified"
        );
    }

    #[test]
    fn error_display_invalid_configuration() {
        let err = AdapterError::InvalidConfiguration {
            reason: "invalid priority: P9".to_string(),
        };
        assert_eq!(err.to_string(), "invalid configuration: invalid priority: P9");
    }

    #[test]
    fn submission_failed_is_transparent() {
        let inner = ClientError::Status {
            status: 422,
            body: "{\"message\":\"Request body is not processable\"}".to_string(),
        };
        let expected = inner.to_string();
        let err = AdapterError::from(inner);

        assert_eq!(err.to_string(), expected);
        assert!(matches!(
            err,
            AdapterError::SubmissionFailed(ClientError::Status { status: 422, .. })
        ));
    }

    #[test]
    fn client_error_from_serde_json() {
        let json_err = serde_json::from_str::<String>("not json");
        assert!(json_err.is_err());
        let err: ClientError = json_err.unwrap_err().into();
        assert!(matches!(err, ClientError::Serialization(_)));
    }
}
