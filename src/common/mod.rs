//! Shared error handling

/// Crate-wide error type
pub mod error;
/// Result alias and helpers
pub mod result;
