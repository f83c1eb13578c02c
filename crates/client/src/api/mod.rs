//! Authenticated API calls and pagination drivers.

mod client;
mod form;
mod history;
mod search;

pub use client::GantryClient;
pub use form::{FormParams, FormValue};
pub use history::HistoryOptions;
