//! Caller authentication

mod jwt;

pub use jwt::{Claims, JwtIdentityResolver, JwtService};
