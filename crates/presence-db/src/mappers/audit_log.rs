//! Audit log entity <-> model mapper

use presence_core::entities::AuditLog;
use presence_core::value_objects::Snowflake;

use crate::models::AuditLogModel;

impl From<AuditLogModel> for AuditLog {
    fn from(model: AuditLogModel) -> Self {
        AuditLog {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            action: model.action,
            entity_type: model.entity_type,
            entity_id: model.entity_id,
            timestamp: model.timestamp,
        }
    }
}
