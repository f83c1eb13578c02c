//! Wire-facing data types for the gantry API
//!
//! Response payloads are deliberately loose: only the fields that drive
//! pagination and cursor advancement are typed, everything else rides
//! along untouched so callers can inspect raw payloads.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::X_ID_HASH_PREFIX_LEN;

/// Current Unix timestamp in fractional seconds.
#[must_use]
pub fn now_epoch_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Login credentials for one workspace, supplied once and immutable for
/// the life of the session.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account email address.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Workspace base URL, e.g. `https://example.slack.com`.
    pub workspace_url: String,
}

impl Credentials {
    /// Create a new credential set. No validation is performed here;
    /// malformed URLs surface as downstream HTTP failures.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        workspace_url: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            workspace_url: workspace_url.into(),
        }
    }
}

/// Per-request query parameters identifying the client build context.
///
/// Derived from the workspace `version_hash` and a timestamp; attached
/// to every API call made under the token minted alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GantryParams {
    /// `<first 8 chars of version_hash>-<fractional-second timestamp>`.
    pub x_id: String,
    /// Timestamp truncated to integer seconds.
    pub version_ts: i64,
}

impl GantryParams {
    /// Derive tracking parameters from a version hash and a timestamp.
    ///
    /// `x_id` carries the timestamp's full fractional-second form; only
    /// `version_ts` truncates to whole seconds.
    #[must_use]
    pub fn derive(version_hash: &str, epoch_seconds: f64) -> Self {
        let prefix: String = version_hash.chars().take(X_ID_HASH_PREFIX_LEN).collect();
        Self {
            x_id: format!("{prefix}-{epoch_seconds}"),
            version_ts: epoch_seconds as i64,
        }
    }

    /// Render as URL query pairs.
    #[must_use]
    pub fn as_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("_x_id", self.x_id.clone()),
            ("x_version_ts", self.version_ts.to_string()),
            ("_x_gantry", "true".to_string()),
        ]
    }
}

/// Token plus the gantry parameters minted with it.
///
/// The two are only valid together and are always replaced as a pair
/// when re-authentication occurs.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Short-lived bearer token scoped to one workspace.
    pub api_token: String,
    /// Tracking parameters attached to every call under this token.
    pub gantry: GantryParams,
}

/// A single message record.
///
/// Only `ts` is required; it doubles as the pagination cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message timestamp, e.g. `"1700000000.000100"`.
    pub ts: String,
    /// Posting user id, absent for some subtypes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Message body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Root timestamp when the message lives in a thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    /// Remaining payload fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One page of `conversations.history` / `conversations.replies`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPage {
    /// Endpoint-level success flag.
    #[serde(default)]
    pub ok: bool,
    /// Messages in server order (newest-first by convention).
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Continuation signal; `false` terminates the walk.
    #[serde(default)]
    pub has_more: bool,
    /// Endpoint-level error code, if any.
    #[serde(default)]
    pub error: Option<String>,
}

/// Pagination block returned by `search.modules`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchPagination {
    /// Page number of this response, starting at 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Total number of pages for the query.
    #[serde(default = "default_page")]
    pub page_count: u32,
    /// Total result count across all pages, when reported.
    #[serde(default)]
    pub total_count: Option<u64>,
}

fn default_page() -> u32 {
    1
}

/// One page of channel search results.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    /// Endpoint-level success flag.
    #[serde(default)]
    pub ok: bool,
    /// Channel records for this page, kept as raw payloads.
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    /// Present on every page; the first page's `page_count` drives the
    /// parallel fetch of the remainder.
    #[serde(default)]
    pub pagination: Option<SearchPagination>,
    /// Endpoint-level error code, if any.
    #[serde(default)]
    pub error: Option<String>,
}
