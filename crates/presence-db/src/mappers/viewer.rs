//! Viewer record <-> model mapper

use presence_core::entities::ViewerRecord;
use presence_core::error::DomainError;
use presence_core::value_objects::{EntityKey, Snowflake};

use crate::models::ViewerModel;

/// Rows are only written through validated keys; a failure here means the
/// table was edited out of band.
impl TryFrom<ViewerModel> for ViewerRecord {
    type Error = DomainError;

    fn try_from(model: ViewerModel) -> Result<Self, Self::Error> {
        let entity = EntityKey::new(model.entity_type, model.entity_id)
            .map_err(|e| DomainError::DatabaseError(format!("corrupt viewer row {}: {e}", model.id)))?;

        Ok(ViewerRecord {
            id: Snowflake::new(model.id),
            entity,
            user_id: Snowflake::new(model.user_id),
            last_active_at: model.last_active_at,
        })
    }
}
