//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("User not logged in")]
    Unauthenticated,

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found")]
    UserNotRegistered,

    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Your account is currently under review. Please wait at least 24-48 hours before submitting a support ticket.")]
    AccountRestricted,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid entity key: {0}")]
    InvalidEntityKey(String),

    #[error("Invalid presence windows: {0}")]
    InvalidWindows(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Token identifier already registered")]
    TokenIdentifierExists,

    #[error("Member number already assigned")]
    MemberNumberExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",

            Self::UserNotRegistered | Self::UserNotFound(_) => "NOT_FOUND",

            Self::Forbidden(_) | Self::AccountRestricted => "FORBIDDEN",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEntityKey(_) => "INVALID_ENTITY_KEY",
            Self::InvalidWindows(_) => "INVALID_PRESENCE_WINDOWS",

            Self::TokenIdentifierExists => "TOKEN_IDENTIFIER_EXISTS",
            Self::MemberNumberExists => "MEMBER_NUMBER_EXISTS",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is an authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotRegistered | Self::UserNotFound(_))
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Forbidden(_) | Self::AccountRestricted)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidEntityKey(_) | Self::InvalidWindows(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::TokenIdentifierExists | Self::MemberNumberExists)
    }

    /// HTTP status this error surfaces as
    pub fn status_code(&self) -> u16 {
        if self.is_authentication() {
            401
        } else if self.is_not_found() {
            404
        } else if self.is_authorization() {
            403
        } else if self.is_validation() {
            400
        } else if self.is_conflict() {
            409
        } else {
            500
        }
    }

    /// Unauthenticated and not-found are the two caller-identity failures
    /// that best-effort presence operations swallow.
    pub fn is_caller_resolution(&self) -> bool {
        self.is_authentication() || self.is_not_found()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DomainError::Unauthenticated.code(), "UNAUTHENTICATED");
        assert_eq!(DomainError::UserNotRegistered.code(), "NOT_FOUND");
        assert_eq!(DomainError::AccountRestricted.code(), "FORBIDDEN");
        assert_eq!(
            DomainError::InvalidEntityKey("x".to_string()).code(),
            "INVALID_ENTITY_KEY"
        );
    }

    #[test]
    fn test_classification() {
        assert!(DomainError::Unauthenticated.is_authentication());
        assert!(DomainError::UserNotFound(Snowflake::new(1)).is_not_found());
        assert!(DomainError::Forbidden("owners only".to_string()).is_authorization());
        assert!(DomainError::InvalidWindows("x".to_string()).is_validation());
        assert!(DomainError::TokenIdentifierExists.is_conflict());
        assert!(!DomainError::DatabaseError("x".to_string()).is_not_found());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(DomainError::Unauthenticated.status_code(), 401);
        assert_eq!(DomainError::UserNotRegistered.status_code(), 404);
        assert_eq!(DomainError::AccountRestricted.status_code(), 403);
        assert_eq!(DomainError::InvalidEntityKey("x".to_string()).status_code(), 400);
        assert_eq!(DomainError::MemberNumberExists.status_code(), 409);
        assert_eq!(DomainError::CacheError("down".to_string()).status_code(), 500);
    }

    #[test]
    fn test_caller_resolution() {
        assert!(DomainError::Unauthenticated.is_caller_resolution());
        assert!(DomainError::UserNotRegistered.is_caller_resolution());
        assert!(!DomainError::CacheError("down".to_string()).is_caller_resolution());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(DomainError::Unauthenticated.to_string(), "User not logged in");
        assert_eq!(
            DomainError::UserNotFound(Snowflake::new(123)).to_string(),
            "User not found: 123"
        );
    }
}
