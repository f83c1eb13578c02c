//! Login handshake and token lifecycle.

pub mod scrape;
mod session;

pub use session::Session;
