//! Common test utilities and helpers
//!
//! Shared fixtures for building sibling-directory layouts with real
//! libgit2 repositories.

#![allow(dead_code)]

pub mod test_fixtures;
