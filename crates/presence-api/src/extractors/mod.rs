//! Axum extractors for request handling
//!
//! Custom extractors for the caller token and path parameters.

mod auth;
mod path;

pub use auth::CallerToken;
pub use path::{EntityPath, ValidPath};
