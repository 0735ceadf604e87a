//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! (Postgres, Redis, or the in-memory test doubles) provides the
//! implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{AuditLog, User, ViewerRecord};
use crate::error::DomainError;
use crate::value_objects::{EntityKey, MemberNumber, Snowflake, ViewerKey};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by identity-provider key
    async fn find_by_token_identifier(&self, token_identifier: &str) -> RepoResult<Option<User>>;

    /// Batch lookup; missing IDs are simply absent from the result
    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Create a new user
    ///
    /// Fails with `TokenIdentifierExists` or `MemberNumberExists` on a
    /// uniqueness conflict.
    async fn create(&self, user: &User) -> RepoResult<()>;

    /// Total number of users
    async fn count(&self) -> RepoResult<u64>;

    /// Users without a member number, oldest first
    async fn list_without_member_number(&self) -> RepoResult<Vec<User>>;

    /// Check if a member number is already assigned
    async fn member_number_exists(&self, number: MemberNumber) -> RepoResult<bool>;

    /// Assign a member number
    async fn set_member_number(&self, id: Snowflake, number: MemberNumber) -> RepoResult<()>;
}

// ============================================================================
// Viewer Repository
// ============================================================================

/// Result of recording a heartbeat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatOutcome {
    /// No record existed; one was inserted
    Created,
    /// The existing record was refreshed in place
    Refreshed,
}

#[async_trait]
pub trait ViewerRepository: Send + Sync {
    /// Find the record for a (entity, user) pair
    async fn find_by_key(&self, key: &ViewerKey) -> RepoResult<Option<ViewerRecord>>;

    /// Insert or refresh the record for `key`
    ///
    /// Must be atomic per key: concurrent calls leave exactly one record whose
    /// `last_active_at` is the maximum of the supplied timestamps. `new_id` is
    /// used only when a record is inserted.
    async fn record_heartbeat(
        &self,
        key: &ViewerKey,
        new_id: Snowflake,
        at: DateTime<Utc>,
    ) -> RepoResult<HeartbeatOutcome>;

    /// Delete the record for `key`, returning whether one existed
    async fn delete_by_key(&self, key: &ViewerKey) -> RepoResult<bool>;

    /// Records for an entity with `last_active_at` strictly after `active_after`
    async fn find_by_entity(
        &self,
        entity: &EntityKey,
        active_after: DateTime<Utc>,
    ) -> RepoResult<Vec<ViewerRecord>>;

    /// Delete up to `limit` records with `last_active_at` strictly before `before`
    ///
    /// The staleness check is re-evaluated at delete time, so a record
    /// refreshed after it was selected survives.
    async fn delete_stale(&self, before: DateTime<Utc>, limit: u32) -> RepoResult<u64>;
}

// ============================================================================
// Audit Log Repository
// ============================================================================

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append an entry
    async fn insert(&self, entry: &AuditLog) -> RepoResult<()>;
}
