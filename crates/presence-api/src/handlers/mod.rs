//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod admin;
pub mod health;
pub mod users;
pub mod viewers;
