//! Service context - dependency container for services
//!
//! Holds the repositories, identity resolver, clock and tuning values the
//! services need. Stores are shared trait objects, so the same context works
//! over PostgreSQL, Redis or the in-memory test doubles.

use std::sync::Arc;

use presence_core::traits::{
    AuditLogRepository, Clock, IdentityResolver, SystemClock, UserRepository, ViewerRepository,
};
use presence_core::{PresenceWindows, Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};

/// Default number of records removed per reap batch
pub const DEFAULT_REAP_BATCH_SIZE: u32 = 500;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    viewer_repo: Arc<dyn ViewerRepository>,
    audit_log_repo: Arc<dyn AuditLogRepository>,

    // Collaborators
    identity: Arc<dyn IdentityResolver>,
    clock: Arc<dyn Clock>,
    snowflake_generator: Arc<SnowflakeGenerator>,

    // Settings
    windows: PresenceWindows,
    reap_batch_size: u32,
    super_admin_email: Option<String>,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the viewer repository
    pub fn viewer_repo(&self) -> &dyn ViewerRepository {
        self.viewer_repo.as_ref()
    }

    /// Get the audit log repository
    pub fn audit_log_repo(&self) -> &dyn AuditLogRepository {
        self.audit_log_repo.as_ref()
    }

    // === Collaborators ===

    /// Get the caller identity resolver
    pub fn identity(&self) -> &dyn IdentityResolver {
        self.identity.as_ref()
    }

    /// Get the clock every presence timestamp is read from
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    // === Settings ===

    pub fn windows(&self) -> PresenceWindows {
        self.windows
    }

    pub fn reap_batch_size(&self) -> u32 {
        self.reap_batch_size
    }

    pub fn super_admin_email(&self) -> Option<&str> {
        self.super_admin_email.as_deref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("windows", &self.windows)
            .field("reap_batch_size", &self.reap_batch_size)
            .field("worker_id", &self.snowflake_generator.worker_id())
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    viewer_repo: Option<Arc<dyn ViewerRepository>>,
    audit_log_repo: Option<Arc<dyn AuditLogRepository>>,
    identity: Option<Arc<dyn IdentityResolver>>,
    clock: Option<Arc<dyn Clock>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    windows: Option<PresenceWindows>,
    reap_batch_size: Option<u32>,
    super_admin_email: Option<String>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn viewer_repo(mut self, repo: Arc<dyn ViewerRepository>) -> Self {
        self.viewer_repo = Some(repo);
        self
    }

    pub fn audit_log_repo(mut self, repo: Arc<dyn AuditLogRepository>) -> Self {
        self.audit_log_repo = Some(repo);
        self
    }

    pub fn identity(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.identity = Some(resolver);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn windows(mut self, windows: PresenceWindows) -> Self {
        self.windows = Some(windows);
        self
    }

    pub fn reap_batch_size(mut self, size: u32) -> Self {
        self.reap_batch_size = Some(size);
        self
    }

    pub fn super_admin_email(mut self, email: Option<String>) -> Self {
        self.super_admin_email = email.map(|e| e.trim().to_lowercase()).filter(|e| !e.is_empty());
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let reap_batch_size = self.reap_batch_size.unwrap_or(DEFAULT_REAP_BATCH_SIZE);
        if reap_batch_size == 0 {
            return Err(ServiceError::validation("reap_batch_size must be at least 1"));
        }

        Ok(ServiceContext {
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            viewer_repo: self
                .viewer_repo
                .ok_or_else(|| ServiceError::validation("viewer_repo is required"))?,
            audit_log_repo: self
                .audit_log_repo
                .ok_or_else(|| ServiceError::validation("audit_log_repo is required"))?,
            identity: self
                .identity
                .ok_or_else(|| ServiceError::validation("identity is required"))?,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            snowflake_generator: self
                .snowflake_generator
                .unwrap_or_else(|| Arc::new(SnowflakeGenerator::default())),
            windows: self.windows.unwrap_or_default(),
            reap_batch_size,
            super_admin_email: self.super_admin_email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        InMemoryAuditLogRepository, InMemoryUserRepository, InMemoryViewerRepository,
        StaticIdentityResolver,
    };

    fn complete() -> ServiceContextBuilder {
        ServiceContext::builder()
            .user_repo(Arc::new(InMemoryUserRepository::default()))
            .viewer_repo(Arc::new(InMemoryViewerRepository::default()))
            .audit_log_repo(Arc::new(InMemoryAuditLogRepository::default()))
            .identity(Arc::new(StaticIdentityResolver::default()))
    }

    #[test]
    fn test_defaults() {
        let ctx = complete().build().unwrap();
        assert_eq!(ctx.windows(), PresenceWindows::default());
        assert_eq!(ctx.reap_batch_size(), DEFAULT_REAP_BATCH_SIZE);
        assert!(ctx.super_admin_email().is_none());
    }

    #[test]
    fn test_missing_dependency() {
        let err = ServiceContext::builder()
            .user_repo(Arc::new(InMemoryUserRepository::default()))
            .build()
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("viewer_repo"));
    }

    #[test]
    fn test_zero_batch_rejected() {
        assert!(complete().reap_batch_size(0).build().is_err());
    }

    #[test]
    fn test_super_admin_email_is_normalized() {
        let ctx = complete()
            .super_admin_email(Some("  Admin@Example.COM ".to_string()))
            .build()
            .unwrap();
        assert_eq!(ctx.super_admin_email(), Some("admin@example.com"));

        let ctx = complete().super_admin_email(Some("   ".to_string())).build().unwrap();
        assert!(ctx.super_admin_email().is_none());
    }
}
