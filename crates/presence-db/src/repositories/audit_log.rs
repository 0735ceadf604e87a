//! PostgreSQL implementation of AuditLogRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use presence_core::entities::AuditLog;
use presence_core::traits::{AuditLogRepository, RepoResult};
use presence_core::value_objects::Snowflake;

use crate::models::AuditLogModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AuditLogRepository
#[derive(Clone)]
pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    /// Create a new PgAuditLogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Entries recorded for a user, newest first
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<AuditLog>> {
        let result = sqlx::query_as::<_, AuditLogModel>(
            r"
            SELECT id, user_id, action, entity_type, entity_id, timestamp
            FROM audit_logs
            WHERE user_id = $1
            ORDER BY timestamp DESC, id DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.into_iter().map(AuditLog::from).collect())
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    #[instrument(skip(self, entry), fields(action = %entry.action, user_id = %entry.user_id))]
    async fn insert(&self, entry: &AuditLog) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO audit_logs (id, user_id, action, entity_type, entity_id, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(entry.id.into_inner())
        .bind(entry.user_id.into_inner())
        .bind(&entry.action)
        .bind(&entry.entity_type)
        .bind(&entry.entity_id)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
