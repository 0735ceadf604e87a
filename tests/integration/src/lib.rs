//! Integration test utilities for the presence server
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API over real PostgreSQL (and optionally Redis).

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
