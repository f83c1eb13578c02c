//! The authenticated request primitive.
//!
//! Every API call funnels through [`GantryClient::post`]: it merges the
//! current token into the caller's parameters, posts them as multipart
//! under the current gantry query parameters, throttles, and recovers
//! from rate limiting by re-authenticating and retrying the same body.

use std::sync::Arc;

use gantry_domain::constants::CLIENT_BOOT;
use gantry_domain::{now_epoch_seconds, ClientConfig, Credentials, GantryError, Result};
use reqwest::Method;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::form::FormParams;
use crate::auth::Session;
use crate::errors::http_err;

/// Client for the internal gantry web API.
///
/// Holds the mutable session state behind an async lock so the parallel
/// search-page fetches can share one token and coordinate re-login.
pub struct GantryClient {
    session: Arc<RwLock<Session>>,
    config: ClientConfig,
}

impl GantryClient {
    /// Log in with the given credentials and return a ready client.
    ///
    /// # Errors
    /// Propagates login failures: `AuthParse` for scrape misses,
    /// `Network` once the transport retry budget is exhausted.
    pub async fn connect(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let mut session = Session::new(credentials, config.clone())?;
        session.login().await?;
        Ok(Self { session: Arc::new(RwLock::new(session)), config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Workspace id of the logged-in session.
    pub async fn workspace_id(&self) -> Option<String> {
        self.session.read().await.workspace_id().map(str::to_string)
    }

    /// Issue an authenticated POST to `<workspace_url>/api/<api_path>`.
    ///
    /// Returns the parsed JSON verbatim; apart from the rate-limit check
    /// this primitive does not interpret `ok`/`error` fields, so callers
    /// inspect the payload for endpoint-specific errors.
    ///
    /// A `ratelimited` response triggers a full re-login and a retry of
    /// the same request body, with exponential backoff, up to the
    /// configured bound.
    ///
    /// # Errors
    /// `GantryError::RateLimited` when recovery attempts are exhausted,
    /// `GantryError::Network` for transport failures, auth errors when a
    /// recovery login fails.
    pub async fn post(&self, api_path: &str, params: &FormParams) -> Result<serde_json::Value> {
        let mut recoveries: u32 = 0;

        loop {
            let (http, url, query, token, generation) = {
                let session = self.session.read().await;
                let auth = session.auth()?;
                (
                    session.http().clone(),
                    format!("{}/api/{}", session.workspace_url().trim_end_matches('/'), api_path),
                    auth.gantry.as_query(),
                    auth.api_token.clone(),
                    session.generation(),
                )
            };

            let mut body = params.clone();
            body.set("token", token.as_str());

            debug!(api_path, attempt = recoveries + 1, "posting api request");
            let response = http
                .send(|| {
                    http.request(Method::POST, &url)
                        .query(&query)
                        .multipart(body.to_multipart())
                })
                .await?;

            // Fixed-rate throttle, applied after every response.
            if !self.config.min_request_interval.is_zero() {
                tokio::time::sleep(self.config.min_request_interval).await;
            }

            let payload: serde_json::Value =
                response.json().await.map_err(http_err)?;

            if payload.get("error").and_then(serde_json::Value::as_str) == Some("ratelimited") {
                if recoveries >= self.config.rate_limit_retries {
                    return Err(GantryError::RateLimited(format!(
                        "{api_path} still rate limited after {recoveries} re-logins"
                    )));
                }

                warn!(api_path, recovery = recoveries + 1, "rate limited; re-authenticating");
                let backoff = self
                    .config
                    .rate_limit_backoff
                    .saturating_mul(1_u32 << recoveries.min(8));
                if !backoff.is_zero() {
                    tokio::time::sleep(backoff).await;
                }

                self.session.write().await.reauthenticate_if_stale(generation).await?;
                recoveries += 1;
                continue;
            }

            return Ok(payload);
        }
    }

    /// Fire the one-shot `client.boot` metadata call.
    ///
    /// No pagination, fixed parameters plus a live timestamp; the raw
    /// payload goes back to the caller.
    pub async fn boot(&self) -> Result<serde_json::Value> {
        let params = FormParams::new()
            .field("version_ts", now_epoch_seconds() as i64)
            .field("_x_reason", "deferred-data");
        self.post(CLIENT_BOOT, &params).await
    }
}
