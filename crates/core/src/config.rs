//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services and
//! controllers. Nothing in this crate reads environment variables while handling a command;
//! the `*_from_env_value` helpers take the raw optional strings the binaries looked up.

use crate::constants::{DEFAULT_REST_URL, DEFAULT_TIMEOUT_SECS};
use crate::{ConfigError, ConfigResult};
use reqwest::Url;
use std::str::FromStr;
use std::time::Duration;

/// When an `add` clears the bound form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClearPolicy {
    /// Clear before the request is sent, whatever its outcome.
    #[default]
    Optimistic,
    /// Clear only once the gateway confirmed the create; a failed request keeps the input.
    OnSuccess,
}

impl FromStr for ClearPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(ClearPolicy::Optimistic),
            "on-success" | "on_success" | "onsuccess" => Ok(ClearPolicy::OnSuccess),
            other => Err(ConfigError::InvalidClearPolicy(other.to_owned())),
        }
    }
}

/// Gateway configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    base_url: Url,
    request_timeout: Duration,
    clear_policy: ClearPolicy,
}

impl GatewayConfig {
    /// Create a new `GatewayConfig`.
    ///
    /// The URL must use `http` or `https` and be able to carry path segments.
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        clear_policy: ClearPolicy,
    ) -> ConfigResult<Self> {
        let invalid = |reason: &str| ConfigError::InvalidUrl {
            url: base_url.to_owned(),
            reason: reason.to_owned(),
        };

        let parsed = Url::parse(base_url.trim()).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a resource path"));
        }
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("timeout must be positive".into()));
        }

        Ok(Self {
            base_url: parsed,
            request_timeout,
            clear_policy,
        })
    }

    /// Build a configuration from raw environment values; missing or blank values fall back
    /// to the defaults.
    pub fn from_env_values(
        base_url: Option<String>,
        timeout_secs: Option<String>,
        clear_policy: Option<String>,
    ) -> ConfigResult<Self> {
        let base_url = base_url_from_env_value(base_url);
        let timeout = request_timeout_from_env_value(timeout_secs)?;
        let policy = clear_policy_from_env_value(clear_policy)?;
        Self::new(&base_url, timeout, policy)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn clear_policy(&self) -> ClearPolicy {
        self.clear_policy
    }

    /// Return a copy pointing at another gateway.
    pub fn with_base_url(&self, base_url: &str) -> ConfigResult<Self> {
        Self::new(base_url, self.request_timeout, self.clear_policy)
    }

    /// Build the HTTP client shared by every entity service.
    pub fn http_client(&self) -> ConfigResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(ConfigError::HttpClient)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the gateway base URL from an optional raw value.
pub fn base_url_from_env_value(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| DEFAULT_REST_URL.to_owned())
}

/// Parse the request timeout, in whole seconds, from an optional raw value.
pub fn request_timeout_from_env_value(value: Option<String>) -> ConfigResult<Duration> {
    let Some(raw) = non_blank(value) else {
        return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidTimeout("timeout must be positive".into())),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(ConfigError::InvalidTimeout(raw)),
    }
}

/// Parse the clear policy from an optional raw value.
pub fn clear_policy_from_env_value(value: Option<String>) -> ConfigResult<ClearPolicy> {
    non_blank(value)
        .map(|v| v.parse())
        .transpose()
        .map(Option::unwrap_or_default)
}
