//! Authenticated session lifecycle.
//!
//! A [`Session`] owns the cookie-bearing transport and the token/gantry
//! pair minted under it. `login()` runs the full browser-style
//! handshake; re-authentication replaces the transport (fresh cookie
//! jar) and the auth context together, never one without the other.

use gantry_domain::constants::SIGNIN_REDIR;
use gantry_domain::{
    now_epoch_seconds, AuthContext, ClientConfig, Credentials, GantryError, GantryParams, Result,
};
use reqwest::Method;
use tracing::{debug, info};

use crate::auth::scrape;
use crate::http::HttpClient;

const USER_AGENT: &str = concat!("gantry-client/", env!("CARGO_PKG_VERSION"));

/// An authenticated workspace session.
///
/// Created once per client; mutated in place by [`Session::login`] and
/// by rate-limit-triggered re-authentication. Credentials are captured
/// at construction and never change.
pub struct Session {
    credentials: Credentials,
    config: ClientConfig,
    http: HttpClient,
    version_hash: Option<String>,
    workspace_id: Option<String>,
    auth: Option<AuthContext>,
    generation: u64,
}

impl Session {
    /// Create an unauthenticated session. Call [`Session::login`] before
    /// issuing API requests.
    ///
    /// # Errors
    /// Returns `GantryError::Network` if the transport cannot be built.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http = build_transport(&config)?;
        Ok(Self {
            credentials,
            config,
            http,
            version_hash: None,
            workspace_id: None,
            auth: None,
            generation: 0,
        })
    }

    /// Run the login handshake and install a fresh auth context.
    ///
    /// Steps: scrape the CSRF crumb from the sign-in page, POST the
    /// credentials, read the build hash from the post-login HTML and the
    /// workspace id from the post-redirect URL, then fetch the API token
    /// from the auth service and derive the gantry parameters.
    ///
    /// Any missing HTML element, JSON match, or token key is fatal for
    /// this call; nothing here retries. Transient transport failures are
    /// absorbed by the transport's own retry budget.
    ///
    /// # Errors
    /// `GantryError::AuthParse` for scrape failures, `GantryError::Network`
    /// once the transport retry budget is exhausted.
    pub async fn login(&mut self) -> Result<()> {
        // A fresh transport means a fresh cookie jar; the old session
        // cookies must not leak into the new login.
        let http = build_transport(&self.config)?;
        let workspace_url = self.credentials.workspace_url.clone();

        debug!(%workspace_url, "fetching sign-in page");
        let signin_page = http
            .send(|| http.request(Method::GET, &workspace_url))
            .await?
            .text()
            .await
            .map_err(crate::errors::http_err)?;
        let crumb = scrape::csrf_token(&signin_page)?;

        debug!(%workspace_url, "submitting sign-in form");
        let login_form = [
            ("signin", "1".to_string()),
            ("redir", SIGNIN_REDIR.to_string()),
            ("has_remember", "1".to_string()),
            ("crumb", crumb),
            ("email", self.credentials.email.clone()),
            ("password", self.credentials.password.clone()),
            ("remember", "on".to_string()),
        ];
        let response = http
            .send(|| http.request(Method::POST, &workspace_url).form(&login_form))
            .await?;

        // The workspace id is the trailing path segment of the final,
        // post-redirect URL.
        let workspace_id = response
            .url()
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .map(str::to_string)
            .ok_or_else(|| {
                GantryError::AuthParse("post-login URL carries no workspace id segment".into())
            })?;

        let client_page = response.text().await.map_err(crate::errors::http_err)?;
        let version_hash = scrape::version_hash(&client_page)?;

        let api_token = self.fetch_api_token(&http, &workspace_id).await?;
        let gantry = GantryParams::derive(&version_hash, now_epoch_seconds());

        info!(%workspace_id, generation = self.generation + 1, "login complete");

        // Commit everything at once: token and gantry params are only
        // valid together, and both belong to the new cookie jar.
        self.http = http;
        self.version_hash = Some(version_hash);
        self.workspace_id = Some(workspace_id);
        self.auth = Some(AuthContext { api_token, gantry });
        self.generation += 1;
        Ok(())
    }

    /// Re-login unless another caller already did since `observed`.
    ///
    /// Parallel requests can hit rate limiting simultaneously; the first
    /// one to reach the write lock refreshes the session, the rest see a
    /// newer generation and keep the refreshed context as-is.
    pub async fn reauthenticate_if_stale(&mut self, observed: u64) -> Result<()> {
        if self.generation != observed {
            debug!(
                observed,
                current = self.generation,
                "session already refreshed by a concurrent caller"
            );
            return Ok(());
        }
        self.login().await
    }

    async fn fetch_api_token(&self, http: &HttpClient, workspace_id: &str) -> Result<String> {
        let auth_url = format!("{}/auth", self.config.auth_base_url.trim_end_matches('/'));
        let query = [
            ("app", "client".to_string()),
            ("lc", (now_epoch_seconds() as i64).to_string()),
            ("return_to", format!("/client/{workspace_id}")),
            ("teams", String::new()),
            ("iframe", "1".to_string()),
        ];

        debug!(%auth_url, %workspace_id, "fetching api token");
        let body = http
            .send(|| http.request(Method::GET, &auth_url).query(&query))
            .await?
            .text()
            .await
            .map_err(crate::errors::http_err)?;

        let auth_payload = scrape::embedded_auth_json(&body)?;
        auth_payload
            .get("teams")
            .and_then(|teams| teams.get(workspace_id))
            .and_then(|team| team.get("token"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                GantryError::AuthParse(format!(
                    "auth payload is missing teams.{workspace_id}.token"
                ))
            })
    }

    /// Current token/gantry pair.
    ///
    /// # Errors
    /// `GantryError::Auth` when the session has not logged in yet.
    pub fn auth(&self) -> Result<&AuthContext> {
        self.auth
            .as_ref()
            .ok_or_else(|| GantryError::Auth("session is not logged in".into()))
    }

    /// Transport bound to the current cookie jar.
    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Workspace base URL from the constructor credentials.
    #[must_use]
    pub fn workspace_url(&self) -> &str {
        &self.credentials.workspace_url
    }

    /// Workspace id derived from the post-login redirect, if logged in.
    #[must_use]
    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    /// Build identifier scraped from the client HTML, if logged in.
    #[must_use]
    pub fn version_hash(&self) -> Option<&str> {
        self.version_hash.as_deref()
    }

    /// Monotonic counter bumped on every successful login.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

fn build_transport(config: &ClientConfig) -> Result<HttpClient> {
    HttpClient::builder()
        .timeout(config.request_timeout)
        .max_attempts(config.transport_attempts)
        .user_agent(USER_AGENT)
        .cookie_store(true)
        .build()
}
