//! Client configuration
//!
//! Tunables for the HTTP transport, throttle, rate-limit recovery, and
//! search fan-out. Defaults match the behavior of the original client;
//! every knob can be overridden through environment variables.
//!
//! ## Environment Variables
//! - `GANTRY_AUTH_BASE_URL`: Base URL of the auxiliary auth service
//! - `GANTRY_MIN_REQUEST_INTERVAL_MS`: Fixed post-response throttle
//! - `GANTRY_TRANSPORT_ATTEMPTS`: Transport attempts per request
//! - `GANTRY_RATE_LIMIT_RETRIES`: Re-login attempts after `ratelimited`
//! - `GANTRY_RATE_LIMIT_BACKOFF_MS`: Base backoff between re-logins
//! - `GANTRY_SEARCH_CONCURRENCY`: Parallel search-page fetches
//! - `GANTRY_REQUEST_TIMEOUT_SECS`: Per-request timeout

use std::time::Duration;

use crate::errors::{GantryError, Result};

/// Default base URL of the auth service that hands out workspace tokens.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://app.slack.com";

/// Behavior tunables for a [`crate::types::Credentials`]-backed client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the auxiliary auth endpoint. Overridable so the full
    /// login handshake can be exercised against a local mock server.
    pub auth_base_url: String,
    /// Fixed sleep after every API response. Not adaptive.
    pub min_request_interval: Duration,
    /// Total transport attempts (initial try + retries) per request.
    pub transport_attempts: usize,
    /// How many times a `ratelimited` response may trigger a re-login
    /// before the call fails with `GantryError::RateLimited`.
    pub rate_limit_retries: u32,
    /// Base delay between rate-limit recoveries, doubled per attempt.
    pub rate_limit_backoff: Duration,
    /// Worker bound for parallel search-page fetches.
    pub search_concurrency: usize,
    /// Per-request timeout applied at the transport layer.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            min_request_interval: Duration::from_millis(100),
            transport_attempts: 8,
            rate_limit_retries: 3,
            rate_limit_backoff: Duration::from_millis(500),
            search_concurrency: 8,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Build a configuration from defaults with environment overrides.
    ///
    /// Unset variables keep their default; set variables must parse.
    ///
    /// # Errors
    /// Returns `GantryError::Config` if a set variable has an invalid
    /// value.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = env_opt("GANTRY_AUTH_BASE_URL") {
            config.auth_base_url = url;
        }
        if let Some(ms) = env_parse::<u64>("GANTRY_MIN_REQUEST_INTERVAL_MS")? {
            config.min_request_interval = Duration::from_millis(ms);
        }
        if let Some(attempts) = env_parse::<usize>("GANTRY_TRANSPORT_ATTEMPTS")? {
            config.transport_attempts = attempts.max(1);
        }
        if let Some(retries) = env_parse::<u32>("GANTRY_RATE_LIMIT_RETRIES")? {
            config.rate_limit_retries = retries;
        }
        if let Some(ms) = env_parse::<u64>("GANTRY_RATE_LIMIT_BACKOFF_MS")? {
            config.rate_limit_backoff = Duration::from_millis(ms);
        }
        if let Some(workers) = env_parse::<usize>("GANTRY_SEARCH_CONCURRENCY")? {
            config.search_concurrency = workers.max(1);
        }
        if let Some(secs) = env_parse::<u64>("GANTRY_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env_opt(name) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| GantryError::Config(format!("Invalid {}: {}", name, e))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_behavior() {
        let config = ClientConfig::default();

        assert_eq!(config.auth_base_url, DEFAULT_AUTH_BASE_URL);
        assert_eq!(config.min_request_interval, Duration::from_millis(100));
        assert_eq!(config.transport_attempts, 8);
        assert_eq!(config.rate_limit_retries, 3);
        assert_eq!(config.search_concurrency, 8);
    }

    #[test]
    fn env_override_applies_and_validates() {
        std::env::set_var("GANTRY_SEARCH_CONCURRENCY", "4");
        let config = ClientConfig::from_env().expect("config should load");
        assert_eq!(config.search_concurrency, 4);
        std::env::remove_var("GANTRY_SEARCH_CONCURRENCY");

        std::env::set_var("GANTRY_TRANSPORT_ATTEMPTS", "not-a-number");
        let result = ClientConfig::from_env();
        assert!(matches!(result, Err(GantryError::Config(_))));
        std::env::remove_var("GANTRY_TRANSPORT_ATTEMPTS");
    }
}
