//! Viewer record - the presence fact "user U has entity E open"

use chrono::{DateTime, Utc};

use crate::entities::User;
use crate::value_objects::{EntityKey, Snowflake, ViewerKey};

/// One record per (entity_type, entity_id, user_id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerRecord {
    /// Store identifier, stable across refreshes
    pub id: Snowflake,
    pub entity: EntityKey,
    /// Back-reference to the viewing user
    pub user_id: Snowflake,
    pub last_active_at: DateTime<Utc>,
}

impl ViewerRecord {
    pub fn new(id: Snowflake, key: ViewerKey, last_active_at: DateTime<Utc>) -> Self {
        Self {
            id,
            entity: key.entity,
            user_id: key.user_id,
            last_active_at,
        }
    }

    pub fn key(&self) -> ViewerKey {
        ViewerKey::new(self.entity.clone(), self.user_id)
    }

    /// Apply a heartbeat; `last_active_at` never moves backwards
    pub fn touch(&mut self, at: DateTime<Utc>) {
        if at > self.last_active_at {
            self.last_active_at = at;
        }
    }
}

/// A viewer as shown to other viewers of the same entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerInfo {
    pub user_id: Snowflake,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub last_active_at: DateTime<Utc>,
}

impl ViewerInfo {
    /// Combine a record with its (possibly deleted) owning user
    pub fn from_record(record: &ViewerRecord, user: Option<&User>) -> Self {
        Self {
            user_id: record.user_id,
            user_name: user
                .map_or(super::UNKNOWN_USER_NAME, User::display_name)
                .to_string(),
            user_avatar: user.and_then(|u| u.avatar.clone()),
            last_active_at: record.last_active_at,
        }
    }
}
