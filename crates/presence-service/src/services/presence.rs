//! Presence service - the active-viewer registry
//!
//! Tracks which users currently have an entity open. Clients heartbeat while
//! the entity is visible, release it on close, and poll the snapshot to see
//! who else is there. Records nobody refreshes are removed by the reaper.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, instrument, warn};

use presence_core::{EntityKey, Snowflake, User, ViewerInfo};

use crate::dto::ActiveViewerResponse;

use super::caller::resolve_caller;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Outcome of one cleanup sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReapReport {
    /// Records removed
    pub deleted: u64,
    /// Delete batches issued
    pub batches: u32,
}

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record that the caller is viewing the entity
    ///
    /// Creates the viewer record on first call and refreshes its
    /// `last_active_at` afterwards.
    ///
    /// # Errors
    /// * `Unauthenticated` - the token does not resolve
    /// * `UserNotRegistered` - the identity has no user record
    /// * `InvalidEntityKey` - the entity type or id is malformed
    #[instrument(skip(self, token))]
    pub async fn register_viewer(
        &self,
        entity_type: &str,
        entity_id: &str,
        token: Option<&str>,
    ) -> ServiceResult<()> {
        let caller = resolve_caller(self.ctx, token).await?;
        let key = EntityKey::new(entity_type, entity_id)?.viewer(caller.id);

        let outcome = self
            .ctx
            .viewer_repo()
            .record_heartbeat(&key, self.ctx.generate_id(), self.ctx.clock().now())
            .await?;

        debug!(%key, ?outcome, "Viewer heartbeat recorded");
        Ok(())
    }

    /// Remove the caller's viewer record for the entity
    ///
    /// Never fails: an unresolved caller, a malformed key or a missing record
    /// is a no-op, and store failures are logged.
    #[instrument(skip(self, token))]
    pub async fn unregister_viewer(&self, entity_type: &str, entity_id: &str, token: Option<&str>) {
        match self.release(entity_type, entity_id, token).await {
            Ok(true) => debug!("Viewer released"),
            Ok(false) => debug!("No viewer record to release"),
            Err(e) if is_silent_failure(&e) => debug!(error = %e, "Release ignored"),
            Err(e) => warn!(error = %e, "Failed to release viewer"),
        }
    }

    async fn release(
        &self,
        entity_type: &str,
        entity_id: &str,
        token: Option<&str>,
    ) -> ServiceResult<bool> {
        let caller = resolve_caller(self.ctx, token).await?;
        let key = EntityKey::new(entity_type, entity_id)?.viewer(caller.id);
        Ok(self.ctx.viewer_repo().delete_by_key(&key).await?)
    }

    /// Other users active on the entity within the active window
    ///
    /// Never fails: anything that prevents answering degrades to an empty list.
    #[instrument(skip(self, token))]
    pub async fn get_active_viewers(
        &self,
        entity_type: &str,
        entity_id: &str,
        token: Option<&str>,
    ) -> Vec<ActiveViewerResponse> {
        match self.snapshot(entity_type, entity_id, token).await {
            Ok(viewers) => viewers.into_iter().map(ActiveViewerResponse::from).collect(),
            Err(e) => {
                if is_silent_failure(&e) {
                    debug!(error = %e, "Snapshot unavailable for caller");
                } else {
                    warn!(error = %e, "Failed to load active viewers");
                }
                Vec::new()
            }
        }
    }

    async fn snapshot(
        &self,
        entity_type: &str,
        entity_id: &str,
        token: Option<&str>,
    ) -> ServiceResult<Vec<ViewerInfo>> {
        let caller = resolve_caller(self.ctx, token).await?;
        let entity = EntityKey::new(entity_type, entity_id)?;
        let active_after = self.ctx.windows().active_cutoff(self.ctx.clock().now());

        let records: Vec<_> = self
            .ctx
            .viewer_repo()
            .find_by_entity(&entity, active_after)
            .await?
            .into_iter()
            .filter(|r| r.user_id != caller.id)
            .collect();

        if records.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Snowflake> = records
            .iter()
            .map(|r| r.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let users: HashMap<Snowflake, User> = self
            .ctx
            .user_repo()
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(records
            .iter()
            .map(|r| ViewerInfo::from_record(r, users.get(&r.user_id)))
            .collect())
    }

    /// Delete every record older than the reap window
    ///
    /// Deletes in batches of the configured size against a cutoff fixed at the
    /// start of the sweep; a record refreshed mid-sweep is kept.
    #[instrument(skip(self))]
    pub async fn cleanup_stale_viewers(&self) -> ServiceResult<ReapReport> {
        let before = self.ctx.windows().reap_cutoff(self.ctx.clock().now());
        let limit = self.ctx.reap_batch_size();
        let mut report = ReapReport::default();

        loop {
            let deleted = self.ctx.viewer_repo().delete_stale(before, limit).await?;
            report.batches += 1;
            report.deleted += deleted;
            if deleted < u64::from(limit) {
                break;
            }
        }

        if report.deleted > 0 {
            info!(deleted = report.deleted, batches = report.batches, "Stale viewers reaped");
        } else {
            debug!("No stale viewers");
        }
        Ok(report)
    }
}

/// Caller and key problems that best-effort operations absorb without a warning
fn is_silent_failure(err: &ServiceError) -> bool {
    err.as_domain()
        .is_some_and(|e| e.is_caller_resolution() || e.is_validation())
}
