//! Startup settings loaded from the environment.
//!
//! - `OPSGENIE_API_KEY`: API key (required by the adapter constructor)
//! - `OPSGENIE_ENDPOINT`: `eu`, `us`, or a full base URL (defaults to US)
//! - `OPSGENIE_DEFAULT_TEAMS`, `OPSGENIE_DEFAULT_TAGS`: comma-separated lists
//! - `OPSGENIE_DEFAULT_ENTITY`, `OPSGENIE_DEFAULT_SOURCE`, `OPSGENIE_DEFAULT_PRIORITY`

use crate::types::{AdapterConfig, Team};
use crate::{ENDPOINT_EU, ENDPOINT_US};

const ENV_API_KEY: &str = "OPSGENIE_API_KEY";
const ENV_ENDPOINT: &str = "OPSGENIE_ENDPOINT";
const ENV_DEFAULT_TEAMS: &str = "OPSGENIE_DEFAULT_TEAMS";
const ENV_DEFAULT_TAGS: &str = "OPSGENIE_DEFAULT_TAGS";
const ENV_DEFAULT_ENTITY: &str = "OPSGENIE_DEFAULT_ENTITY";
const ENV_DEFAULT_SOURCE: &str = "OPSGENIE_DEFAULT_SOURCE";
const ENV_DEFAULT_PRIORITY: &str = "OPSGENIE_DEFAULT_PRIORITY";

/// Everything needed to build an [`AlertAdapter`](crate::AlertAdapter).
#[derive(Clone, PartialEq, Eq)]
pub struct AdapterSettings {
    /// Opsgenie API key. May be empty; the adapter constructor rejects it.
    pub api_key: String,
    /// Opsgenie base URL.
    pub endpoint: String,
    /// Alert defaults, not yet validated.
    pub config: AdapterConfig,
}

impl std::fmt::Debug for AdapterSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterSettings")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("config", &self.config)
            .finish()
    }
}

impl AdapterSettings {
    /// Loads settings from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let config = AdapterConfig {
            default_teams: split_list(&var(ENV_DEFAULT_TEAMS))
                .into_iter()
                .map(Team::named)
                .collect(),
            default_tags: split_list(&var(ENV_DEFAULT_TAGS)),
            default_entity: var(ENV_DEFAULT_ENTITY),
            default_source: var(ENV_DEFAULT_SOURCE),
            default_priority: var(ENV_DEFAULT_PRIORITY),
        };

        Self {
            api_key: var(ENV_API_KEY),
            endpoint: resolve_endpoint(&var(ENV_ENDPOINT)),
            config,
        }
    }
}

/// Maps the `eu`/`us` shortcuts to their base URLs; anything else is kept.
#[must_use]
pub fn resolve_endpoint(value: &str) -> String {
    if value.is_empty() || value.eq_ignore_ascii_case("us") {
        ENDPOINT_US.to_string()
    } else if value.eq_ignore_ascii_case("eu") {
        ENDPOINT_EU.to_string()
    } else {
        value.to_string()
    }
}

/// Splits a comma-separated list, dropping blank items.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
