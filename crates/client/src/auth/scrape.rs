//! Narrow parsing interface over the auth HTML and script bodies.
//!
//! The login handshake scrapes three values out of server responses: a
//! CSRF crumb from the sign-in form, a build hash from the client HTML,
//! and a JSON blob embedded in a `JSON.stringify(...)` call. Keeping the
//! extraction here, free of any HTTP, makes the scraping swappable and
//! testable on fixture strings.

use gantry_domain::{GantryError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

const CRUMB_SELECTOR: &str = "#signin_form input[name=\"crumb\"]";

static STRINGIFY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)JSON\.stringify\((.+?)\);").expect("hardcoded regex is valid"));

/// Extract the CSRF crumb from the sign-in page.
///
/// # Errors
/// `GantryError::AuthParse` when the sign-in form or its crumb input is
/// missing. This is fatal for the login attempt; no retry happens here.
pub fn csrf_token(html: &str) -> Result<String> {
    let selector = Selector::parse(CRUMB_SELECTOR)
        .map_err(|e| GantryError::Internal(format!("invalid crumb selector: {e}")))?;

    let document = Html::parse_document(html);
    document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
        .ok_or_else(|| GantryError::AuthParse("sign-in page is missing the crumb input".into()))
}

/// Extract the workspace build identifier from the client HTML.
///
/// The hash lives in a `data-version-hash` attribute on the root
/// element.
pub fn version_hash(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    document
        .root_element()
        .value()
        .attr("data-version-hash")
        .map(str::to_string)
        .ok_or_else(|| {
            GantryError::AuthParse("client HTML is missing the data-version-hash attribute".into())
        })
}

/// Extract the JSON object passed to the first `JSON.stringify(...)`
/// call in a script body.
pub fn embedded_auth_json(body: &str) -> Result<serde_json::Value> {
    let raw = STRINGIFY_RE
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str())
        .ok_or_else(|| {
            GantryError::AuthParse("auth response contains no JSON.stringify payload".into())
        })?;

    serde_json::from_str(raw)
        .map_err(|e| GantryError::AuthParse(format!("embedded auth payload is not valid JSON: {e}")))
}
