//! Viewer database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for viewers table
#[derive(Debug, Clone, FromRow)]
pub struct ViewerModel {
    pub id: i64,
    pub entity_type: String,
    pub entity_id: String,
    pub user_id: i64,
    pub last_active_at: DateTime<Utc>,
}
