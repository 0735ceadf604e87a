//! Service layer errors
//!
//! Domain failures pass through untouched so the HTTP layer can classify
//! them; the remaining variants cover service-level checks.

use std::fmt;

use presence_core::DomainError;

#[derive(Debug)]
pub enum ServiceError {
    /// Failure raised by the domain or a repository
    Domain(DomainError),

    /// Bad input or bad wiring
    Validation(String),

    /// Retries ran out against a uniqueness constraint
    Conflict(String),

    /// Broken invariant
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => e.fmt(f),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// No identity could be resolved for the caller
    pub fn unauthenticated() -> Self {
        DomainError::Unauthenticated.into()
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        DomainError::Forbidden(msg.into()).into()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => e.status_code(),
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_is_401() {
        let err = ServiceError::unauthenticated();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.error_code(), "UNAUTHENTICATED");
        assert_eq!(err.to_string(), "User not logged in");
    }

    #[test]
    fn test_unregistered_is_404() {
        let err = ServiceError::from(DomainError::UserNotRegistered);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_forbidden_error() {
        let err = ServiceError::forbidden("Only owners can run this migration");
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "FORBIDDEN");
        assert!(err.to_string().contains("Only owners"));
    }

    #[test]
    fn test_invalid_entity_key_is_400() {
        let err = ServiceError::from(DomainError::InvalidEntityKey("bad".to_string()));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_ENTITY_KEY");
    }

    #[test]
    fn test_store_failure_is_500() {
        let err = ServiceError::from(DomainError::CacheError("down".to_string()));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "CACHE_ERROR");
    }

    #[test]
    fn test_service_level_variants() {
        let err = ServiceError::validation("reap_batch_size must be at least 1");
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_string(),
            "Validation error: reap_batch_size must be at least 1"
        );

        assert_eq!(ServiceError::conflict("taken").status_code(), 409);
        assert_eq!(ServiceError::internal("gone").status_code(), 500);
    }

    #[test]
    fn test_as_domain() {
        let err = ServiceError::unauthenticated();
        assert!(err.as_domain().is_some_and(DomainError::is_authentication));
        assert!(ServiceError::validation("x").as_domain().is_none());
    }
}
