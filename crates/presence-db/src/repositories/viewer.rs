//! PostgreSQL implementation of ViewerRepository
//!
//! Every mutation is a single statement, so per-key atomicity comes from the
//! `viewers_entity_user_key` unique index and row locks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use presence_core::entities::ViewerRecord;
use presence_core::traits::{HeartbeatOutcome, RepoResult, ViewerRepository};
use presence_core::value_objects::{EntityKey, Snowflake, ViewerKey};

use crate::models::ViewerModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ViewerRepository
#[derive(Clone)]
pub struct PgViewerRepository {
    pool: PgPool,
}

impl PgViewerRepository {
    /// Create a new PgViewerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ViewerRepository for PgViewerRepository {
    #[instrument(skip(self, key), fields(key = %key))]
    async fn find_by_key(&self, key: &ViewerKey) -> RepoResult<Option<ViewerRecord>> {
        let result = sqlx::query_as::<_, ViewerModel>(
            r"
            SELECT id, entity_type, entity_id, user_id, last_active_at
            FROM viewers
            WHERE entity_type = $1 AND entity_id = $2 AND user_id = $3
            ",
        )
        .bind(key.entity.entity_type())
        .bind(key.entity.entity_id())
        .bind(key.user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ViewerRecord::try_from).transpose()
    }

    #[instrument(skip(self, key), fields(key = %key))]
    async fn record_heartbeat(
        &self,
        key: &ViewerKey,
        new_id: Snowflake,
        at: DateTime<Utc>,
    ) -> RepoResult<HeartbeatOutcome> {
        // xmax is 0 only for a freshly inserted tuple
        let inserted = sqlx::query_scalar::<_, bool>(
            r"
            INSERT INTO viewers (id, entity_type, entity_id, user_id, last_active_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (entity_type, entity_id, user_id) DO UPDATE
            SET last_active_at = GREATEST(viewers.last_active_at, EXCLUDED.last_active_at)
            RETURNING (xmax = 0)
            ",
        )
        .bind(new_id.into_inner())
        .bind(key.entity.entity_type())
        .bind(key.entity.entity_id())
        .bind(key.user_id.into_inner())
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(if inserted {
            HeartbeatOutcome::Created
        } else {
            HeartbeatOutcome::Refreshed
        })
    }

    #[instrument(skip(self, key), fields(key = %key))]
    async fn delete_by_key(&self, key: &ViewerKey) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM viewers
            WHERE entity_type = $1 AND entity_id = $2 AND user_id = $3
            ",
        )
        .bind(key.entity.entity_type())
        .bind(key.entity.entity_id())
        .bind(key.user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, entity), fields(entity = %entity))]
    async fn find_by_entity(
        &self,
        entity: &EntityKey,
        active_after: DateTime<Utc>,
    ) -> RepoResult<Vec<ViewerRecord>> {
        let result = sqlx::query_as::<_, ViewerModel>(
            r"
            SELECT id, entity_type, entity_id, user_id, last_active_at
            FROM viewers
            WHERE entity_type = $1 AND entity_id = $2 AND last_active_at > $3
            ",
        )
        .bind(entity.entity_type())
        .bind(entity.entity_id())
        .bind(active_after)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.into_iter().map(ViewerRecord::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn delete_stale(&self, before: DateTime<Utc>, limit: u32) -> RepoResult<u64> {
        // The outer predicate re-checks staleness against the locked row, so a
        // heartbeat committed after the subquery snapshot keeps its record.
        let result = sqlx::query(
            r"
            DELETE FROM viewers
            WHERE id IN (
                SELECT id FROM viewers
                WHERE last_active_at < $1
                ORDER BY last_active_at
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
            AND last_active_at < $1
            ",
        )
        .bind(before)
        .bind(i64::from(limit))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgViewerRepository>();
    }
}
