//! Shared helpers: a wiremock-backed fake workspace that serves the
//! whole login handshake, plus small utilities for picking multipart
//! fields out of recorded requests.

use gantry_domain::{ClientConfig, Credentials};
use gantry_client::GantryClient;
use std::sync::Once;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static TRACING: Once = Once::new();

/// Route client tracing through the test harness, filtered by
/// `RUST_LOG`. Safe to call from every test; only the first call
/// installs the subscriber.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub const CRUMB: &str = "abc123";
pub const VERSION_HASH: &str = "deadbeef1234";
pub const WORKSPACE_ID: &str = "T000ID";
pub const API_TOKEN: &str = "xoxc-test-token";

/// Sign-in page served for `GET /`.
pub fn signin_page() -> String {
    format!(
        r#"<html><body>
            <form id="signin_form" action="/">
              <input type="hidden" name="crumb" value="{CRUMB}">
            </form>
        </body></html>"#
    )
}

/// Client page served after the post-login redirect.
pub fn client_page() -> String {
    format!(r#"<html data-version-hash="{VERSION_HASH}"><body></body></html>"#)
}

/// Script body served by the fake auth service.
pub fn auth_script() -> String {
    format!(
        r#"var boot_data = JSON.stringify({{"teams": {{"{WORKSPACE_ID}": {{"token": "{API_TOKEN}"}}}}}});"#
    )
}

/// Mount the full login handshake on `server`.
///
/// Serves: the sign-in page, the credential POST (302 to the client
/// URL), the client page carrying the version hash, and the auth
/// endpoint embedding the token JSON.
pub async fn mount_login_flow(server: &MockServer) {
    mount_signin_flow(server).await;
    mount_auth_service(server).await;
}

/// Mount only the workspace side of the handshake (sign-in page,
/// credential POST, post-redirect client page). Lets tests pair it
/// with a custom auth-service response.
pub async fn mount_signin_flow(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(signin_page()))
        .mount(server)
        .await;

    let client_path = format!("/client/{WORKSPACE_ID}");
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}{}", server.uri(), client_path).as_str()),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(client_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(client_page()))
        .mount(server)
        .await;
}

/// Mount the auth service endpoint that embeds the token JSON.
pub async fn mount_auth_service(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_string(auth_script()))
        .mount(server)
        .await;
}

/// Configuration pointed at the mock server, with throttling and
/// backoff zeroed out so tests run fast.
pub fn test_config(server: &MockServer) -> ClientConfig {
    init_tracing();
    ClientConfig {
        auth_base_url: server.uri(),
        min_request_interval: Duration::ZERO,
        transport_attempts: 2,
        rate_limit_retries: 3,
        rate_limit_backoff: Duration::ZERO,
        search_concurrency: 8,
        request_timeout: Duration::from_secs(5),
    }
}

pub fn test_credentials(server: &MockServer) -> Credentials {
    Credentials::new("a@b.com", "pw", server.uri())
}

/// Start a mock workspace and return a logged-in client against it.
pub async fn connect_client(server: &MockServer) -> GantryClient {
    GantryClient::connect(test_credentials(server), test_config(server))
        .await
        .expect("login against mock workspace should succeed")
}

/// Extract a text field from a recorded multipart body.
///
/// Naive but sufficient for reqwest-generated bodies: locates the
/// `name="..."` marker, skips the blank line, reads to end-of-line.
pub fn multipart_field(body: &[u8], name: &str) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let marker = format!("name=\"{name}\"");
    let start = text.find(&marker)?;
    let after_headers = text[start..].find("\r\n\r\n")? + start + 4;
    let end = text[after_headers..].find("\r\n")? + after_headers;
    Some(text[after_headers..end].to_string())
}

/// Count recorded requests hitting `target_path` with `target_method`.
pub async fn count_requests(server: &MockServer, target_method: &str, target_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|req| {
            req.method.to_string() == target_method && req.url.path() == target_path
        })
        .count()
}
