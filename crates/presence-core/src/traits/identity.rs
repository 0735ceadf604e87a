//! Caller identity

use async_trait::async_trait;

use crate::error::DomainError;

/// Claims of an authenticated caller as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable provider key (`issuer|subject`)
    pub token_identifier: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

impl Identity {
    /// Build the provider key from issuer and subject claims
    pub fn token_identifier_for(issuer: &str, subject: &str) -> String {
        format!("{issuer}|{subject}")
    }
}

/// Resolves the caller of a request
///
/// `Ok(None)` means the caller is unauthenticated; `Err` is reserved for
/// failures of the provider itself.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: Option<&str>) -> Result<Option<Identity>, DomainError>;
}
