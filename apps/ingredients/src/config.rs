//! Configuration management for the ingredient manager.
//!
//! Loads configuration from environment variables (a `.env` file is read
//! first by the binary) with sensible defaults.

use crate::reducer::RequestPolicy;
use larder_core::request::FailureContext;
use larder_docstore::{Collection, EndpointError};
use std::time::Duration;
use thiserror::Error;

/// Root URL of the document store
pub const DATABASE_URL: &str = "LARDER_DATABASE_URL";
/// Collection holding the ingredients
pub const COLLECTION: &str = "LARDER_COLLECTION";
/// Search debounce in milliseconds
pub const DEBOUNCE_MS: &str = "LARDER_DEBOUNCE_MS";
/// Keep tag and correlation on a failed request
pub const KEEP_CONTEXT_ON_FAILURE: &str = "LARDER_KEEP_CONTEXT_ON_FAILURE";
/// Abort in-flight requests on a newer send or a dismiss
pub const CANCEL_ON_CLEAR: &str = "LARDER_CANCEL_ON_CLEAR";
/// Per-request timeout in seconds; unset means no timeout
pub const REQUEST_TIMEOUT_SECS: &str = "LARDER_REQUEST_TIMEOUT_SECS";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is set to something unusable
    #[error("invalid value {value:?} for {key}")]
    Invalid {
        /// The variable
        key: &'static str,
        /// What it was set to
        value: String,
    },

    /// The store URL or collection name is unusable
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where the ingredients live
    pub collection: Collection,
    /// Search debounce
    pub debounce: Duration,
    /// Failure context policy of both trackers
    pub failure_context: FailureContext,
    /// Abort in-flight requests on a newer send or a dismiss
    pub cancel_in_flight: bool,
    /// Per-request timeout, if any
    pub request_timeout: Option<Duration>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `LARDER_DATABASE_URL` is missing or any
    /// variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value if set.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = lookup(DATABASE_URL).ok_or(ConfigError::Missing(DATABASE_URL))?;
        let name = lookup(COLLECTION).unwrap_or_else(|| "ingredients".to_string());

        let debounce = match lookup(DEBOUNCE_MS) {
            Some(value) => Duration::from_millis(parse_number(DEBOUNCE_MS, value)?),
            None => Duration::from_millis(500),
        };

        let keep_context = match lookup(KEEP_CONTEXT_ON_FAILURE) {
            Some(value) => parse_bool(KEEP_CONTEXT_ON_FAILURE, value)?,
            None => true,
        };

        let cancel_in_flight = match lookup(CANCEL_ON_CLEAR) {
            Some(value) => parse_bool(CANCEL_ON_CLEAR, value)?,
            None => false,
        };

        let request_timeout = lookup(REQUEST_TIMEOUT_SECS)
            .map(|value| parse_number(REQUEST_TIMEOUT_SECS, value).map(Duration::from_secs))
            .transpose()?;

        Ok(Self {
            collection: Collection::new(&base, &name)?,
            debounce,
            failure_context: if keep_context {
                FailureContext::Retain
            } else {
                FailureContext::Discard
            },
            cancel_in_flight,
            request_timeout,
        })
    }

    /// Tracker policy derived from this configuration
    #[must_use]
    pub const fn policy(&self) -> RequestPolicy {
        RequestPolicy {
            failure_context: self.failure_context,
            cancel_in_flight: self.cancel_in_flight,
        }
    }
}

fn parse_number(key: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_url_is_set() {
        let config = load(&[(DATABASE_URL, "https://db.test")]).unwrap();

        assert_eq!(config.collection.url(), "https://db.test/ingredients.json");
        assert_eq!(config.debounce, Duration::from_millis(500));
        assert_eq!(config.failure_context, FailureContext::Retain);
        assert!(!config.cancel_in_flight);
        assert!(config.request_timeout.is_none());
        assert_eq!(config.policy(), RequestPolicy::default());
    }

    #[test]
    fn url_is_required() {
        assert!(matches!(
            load(&[(COLLECTION, "pantry")]),
            Err(ConfigError::Missing(DATABASE_URL))
        ));
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            (DATABASE_URL, "https://db.test/app"),
            (COLLECTION, "pantry"),
            (DEBOUNCE_MS, "250"),
            (KEEP_CONTEXT_ON_FAILURE, "no"),
            (CANCEL_ON_CLEAR, "1"),
            (REQUEST_TIMEOUT_SECS, " 10 "),
        ])
        .unwrap();

        assert_eq!(config.collection.url(), "https://db.test/app/pantry.json");
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert_eq!(config.failure_context, FailureContext::Discard);
        assert!(config.cancel_in_flight);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn invalid_values_are_errors() {
        let error = load(&[(DATABASE_URL, "https://db.test"), (DEBOUNCE_MS, "soon")]).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::Invalid { key: DEBOUNCE_MS, ref value } if value == "soon"
        ));

        let error = load(&[(DATABASE_URL, "https://db.test"), (CANCEL_ON_CLEAR, "maybe")]);
        assert!(matches!(error, Err(ConfigError::Invalid { key: CANCEL_ON_CLEAR, .. })));
    }

    #[test]
    fn bad_url_is_an_endpoint_error() {
        assert!(matches!(
            load(&[(DATABASE_URL, "not a url")]),
            Err(ConfigError::Endpoint(_))
        ));
    }
}
