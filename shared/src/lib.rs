//! Recipe API Shared Library
//!
//! This crate contains the wire types and validation rules shared between
//! the backend and API clients.

pub mod types;

// Re-export commonly used items
pub use types::*;
