//! # Gantry Client
//!
//! Client for Slack's internal ("gantry") web API.
//!
//! This crate contains:
//! - HTTP transport with bounded retry and backoff
//! - The browser-style login handshake and token scraping
//! - The authenticated multipart POST primitive with rate-limit recovery
//! - Cursor- and page-based pagination drivers
//!
//! ## Architecture
//! - Domain types and errors live in `gantry-domain`
//! - Contains all "impure" code (network I/O, HTML scraping)

pub mod api;
pub mod auth;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{FormParams, FormValue, GantryClient, HistoryOptions};
pub use auth::Session;
pub use http::HttpClient;
