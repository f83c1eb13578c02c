//! # Gantry Domain
//!
//! Domain types and models for the gantry Slack client.
//!
//! This crate contains:
//! - Wire-facing data types (messages, pagination pages, auth context)
//! - Domain error types and Result definitions
//! - Client configuration structures
//! - Endpoint and cursor constants
//!
//! ## Architecture
//! - No dependencies on other gantry crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
