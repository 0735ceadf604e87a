//! In-memory test doubles
//!
//! Repositories backed by `dashmap`/`parking_lot`, a manually driven clock and
//! a token table standing in for the identity provider. Enabled for this
//! crate's own tests and, through the `test-utils` feature, for downstream
//! crates.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};

use presence_core::traits::{
    AuditLogRepository, Clock, HeartbeatOutcome, Identity, IdentityResolver, RepoResult,
    UserRepository, ViewerRepository,
};
use presence_core::{
    AuditLog, DomainError, EntityKey, MemberNumber, Role, Snowflake, User, ViewerKey,
    ViewerRecord,
};

use crate::services::{ServiceContext, ServiceContextBuilder};

// ============================================================================
// Clock
// ============================================================================

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Clock positioned at a Unix millisecond timestamp
    pub fn at_millis(millis: i64) -> Self {
        Self::new(millis_to_datetime(millis))
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock() = at;
    }

    pub fn set_millis(&self, millis: i64) {
        self.set(millis_to_datetime(millis));
    }

    pub fn advance(&self, by: TimeDelta) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap_or_default())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

// ============================================================================
// Identity
// ============================================================================

/// Identity provider backed by a token table
#[derive(Debug, Default)]
pub struct StaticIdentityResolver {
    tokens: DashMap<String, Identity>,
}

impl StaticIdentityResolver {
    /// Make `token` resolve to `identity`
    pub fn sign_in(&self, token: impl Into<String>, identity: Identity) {
        self.tokens.insert(token.into(), identity);
    }

    pub fn sign_out(&self, token: &str) {
        self.tokens.remove(token);
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, token: Option<&str>) -> Result<Option<Identity>, DomainError> {
        Ok(token.and_then(|t| self.tokens.get(t).map(|entry| entry.value().clone())))
    }
}

/// Identity with the given provider key and display name
pub fn identity(token_identifier: &str, name: Option<&str>, email: Option<&str>) -> Identity {
    Identity {
        token_identifier: token_identifier.to_string(),
        name: name.map(str::to_string),
        email: email.map(str::to_string),
        picture: None,
    }
}

// ============================================================================
// User Repository
// ============================================================================

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Snowflake, User>>,
}

impl InMemoryUserRepository {
    /// Remove a user, leaving any viewer records pointing at it
    pub fn remove(&self, id: Snowflake) -> Option<User> {
        self.users.write().remove(&id)
    }

    pub fn all(&self) -> Vec<User> {
        self.users.read().values().cloned().collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn find_by_token_identifier(&self, token_identifier: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.token_identifier == token_identifier)
            .cloned())
    }

    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        let users = self.users.read();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        let mut users = self.users.write();
        if users
            .values()
            .any(|u| u.token_identifier == user.token_identifier)
        {
            return Err(DomainError::TokenIdentifierExists);
        }
        if user.member_number.is_some()
            && users.values().any(|u| u.member_number == user.member_number)
        {
            return Err(DomainError::MemberNumberExists);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn count(&self) -> RepoResult<u64> {
        Ok(self.users.read().len() as u64)
    }

    async fn list_without_member_number(&self) -> RepoResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .read()
            .values()
            .filter(|u| u.member_number.is_none())
            .cloned()
            .collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        Ok(users)
    }

    async fn member_number_exists(&self, number: MemberNumber) -> RepoResult<bool> {
        Ok(self
            .users
            .read()
            .values()
            .any(|u| u.member_number == Some(number)))
    }

    async fn set_member_number(&self, id: Snowflake, number: MemberNumber) -> RepoResult<()> {
        let mut users = self.users.write();
        if users
            .values()
            .any(|u| u.id != id && u.member_number == Some(number))
        {
            return Err(DomainError::MemberNumberExists);
        }
        let user = users.get_mut(&id).ok_or(DomainError::UserNotFound(id))?;
        user.set_member_number(number);
        Ok(())
    }
}

// ============================================================================
// Viewer Repository
// ============================================================================

/// Viewer store keyed by the uniqueness triple; the map entry lock makes each
/// heartbeat atomic per key
#[derive(Debug, Default)]
pub struct InMemoryViewerRepository {
    records: DashMap<ViewerKey, ViewerRecord>,
}

impl InMemoryViewerRepository {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ViewerRepository for InMemoryViewerRepository {
    async fn find_by_key(&self, key: &ViewerKey) -> RepoResult<Option<ViewerRecord>> {
        Ok(self.records.get(key).map(|r| r.value().clone()))
    }

    async fn record_heartbeat(
        &self,
        key: &ViewerKey,
        new_id: Snowflake,
        at: DateTime<Utc>,
    ) -> RepoResult<HeartbeatOutcome> {
        match self.records.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().touch(at);
                Ok(HeartbeatOutcome::Refreshed)
            }
            Entry::Vacant(entry) => {
                entry.insert(ViewerRecord::new(new_id, key.clone(), at));
                Ok(HeartbeatOutcome::Created)
            }
        }
    }

    async fn delete_by_key(&self, key: &ViewerKey) -> RepoResult<bool> {
        Ok(self.records.remove(key).is_some())
    }

    async fn find_by_entity(
        &self,
        entity: &EntityKey,
        active_after: DateTime<Utc>,
    ) -> RepoResult<Vec<ViewerRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| &r.entity == entity && r.last_active_at > active_after)
            .map(|r| r.value().clone())
            .collect())
    }

    async fn delete_stale(&self, before: DateTime<Utc>, limit: u32) -> RepoResult<u64> {
        let mut candidates: Vec<(DateTime<Utc>, ViewerKey)> = self
            .records
            .iter()
            .filter(|r| r.last_active_at < before)
            .map(|r| (r.last_active_at, r.key().clone()))
            .collect();
        candidates.sort_by_key(|(at, _)| *at);
        candidates.truncate(limit as usize);

        let deleted = candidates
            .into_iter()
            .filter(|(_, key)| {
                self.records
                    .remove_if(key, |_, r| r.last_active_at < before)
                    .is_some()
            })
            .count();
        Ok(deleted as u64)
    }
}

/// Viewer store whose every call fails, for exercising the swallow paths
#[derive(Debug, Default)]
pub struct FailingViewerRepository;

impl FailingViewerRepository {
    fn unavailable<T>() -> RepoResult<T> {
        Err(DomainError::CacheError("viewer store unavailable".to_string()))
    }
}

#[async_trait]
impl ViewerRepository for FailingViewerRepository {
    async fn find_by_key(&self, _key: &ViewerKey) -> RepoResult<Option<ViewerRecord>> {
        Self::unavailable()
    }

    async fn record_heartbeat(
        &self,
        _key: &ViewerKey,
        _new_id: Snowflake,
        _at: DateTime<Utc>,
    ) -> RepoResult<HeartbeatOutcome> {
        Self::unavailable()
    }

    async fn delete_by_key(&self, _key: &ViewerKey) -> RepoResult<bool> {
        Self::unavailable()
    }

    async fn find_by_entity(
        &self,
        _entity: &EntityKey,
        _active_after: DateTime<Utc>,
    ) -> RepoResult<Vec<ViewerRecord>> {
        Self::unavailable()
    }

    async fn delete_stale(&self, _before: DateTime<Utc>, _limit: u32) -> RepoResult<u64> {
        Self::unavailable()
    }
}

// ============================================================================
// Audit Log Repository
// ============================================================================

#[derive(Debug, Default)]
pub struct InMemoryAuditLogRepository {
    entries: Mutex<Vec<AuditLog>>,
}

impl InMemoryAuditLogRepository {
    pub fn entries(&self) -> Vec<AuditLog> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn insert(&self, entry: &AuditLog) -> RepoResult<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A service context wired to in-memory doubles, with handles to each of them
pub struct TestHarness {
    pub users: Arc<InMemoryUserRepository>,
    pub viewers: Arc<InMemoryViewerRepository>,
    pub audit_logs: Arc<InMemoryAuditLogRepository>,
    pub identity: Arc<StaticIdentityResolver>,
    pub clock: Arc<ManualClock>,
    pub ctx: Arc<ServiceContext>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with(|builder| builder)
    }

    /// Build with extra settings applied on top of the in-memory wiring
    ///
    /// # Panics
    /// Panics if `configure` produces an invalid context
    pub fn with(configure: impl FnOnce(ServiceContextBuilder) -> ServiceContextBuilder) -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let viewers = Arc::new(InMemoryViewerRepository::default());
        let audit_logs = Arc::new(InMemoryAuditLogRepository::default());
        let identity = Arc::new(StaticIdentityResolver::default());
        let clock = Arc::new(ManualClock::default());

        let builder = ServiceContext::builder()
            .user_repo(users.clone())
            .viewer_repo(viewers.clone())
            .audit_log_repo(audit_logs.clone())
            .identity(identity.clone())
            .clock(clock.clone());

        let ctx = match configure(builder).build() {
            Ok(ctx) => Arc::new(ctx),
            Err(e) => panic!("invalid test context: {e}"),
        };

        Self {
            users,
            viewers,
            audit_logs,
            identity,
            clock,
            ctx,
        }
    }

    /// Register a provisioned member reachable through `token`
    pub async fn sign_up(&self, token: &str, name: &str) -> User {
        let token_identifier = format!("https://issuer.test|{token}");
        self.identity
            .sign_in(token, identity(&token_identifier, Some(name), None));

        let mut user = User::new(self.ctx.generate_id(), token_identifier, Role::Member);
        user.name = Some(name.to_string());
        user.created_at = self.clock.now();
        user.updated_at = user.created_at;
        if let Err(e) = self.users.create(&user).await {
            panic!("failed to seed user {name}: {e}");
        }
        user
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
