//! Audit log entry

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Append-only record of an account action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLog {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditLog {
    pub const ACCOUNT_CREATED: &'static str = "Account created";

    /// Entry for a newly provisioned account
    pub fn account_created(id: Snowflake, user_id: Snowflake, at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            action: Self::ACCOUNT_CREATED.to_string(),
            entity_type: "user".to_string(),
            entity_id: user_id.to_string(),
            timestamp: at,
        }
    }
}
