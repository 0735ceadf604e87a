//! # presence-core
//!
//! Domain layer for the active-viewer presence service: entities, value objects,
//! presence windows, repository and identity traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{AuditLog, User, ViewerInfo, ViewerRecord, UNKNOWN_USER_NAME};
pub use error::DomainError;
pub use traits::{
    AuditLogRepository, Clock, HeartbeatOutcome, Identity, IdentityResolver, RepoResult,
    SystemClock, UserRepository, ViewerRepository,
};
pub use value_objects::{
    EntityKey, MemberNumber, Permissions, PresenceWindows, Role, Snowflake, SnowflakeGenerator,
    SnowflakeParseError, ViewerKey,
};
