//! Entity and viewer keys
//!
//! An [`EntityKey`] names a viewed object (`entity_type`, `entity_id`); a
//! [`ViewerKey`] adds the viewing user and is the uniqueness key of a
//! viewer record.

use std::fmt;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Maximum length in bytes of `entity_type` and `entity_id`
pub const MAX_KEY_LENGTH: usize = 128;

/// The viewed object: a discriminator plus an instance identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    entity_type: String,
    entity_id: String,
}

impl EntityKey {
    /// Build a validated key
    ///
    /// Both parts must be non-empty and at most [`MAX_KEY_LENGTH`] bytes;
    /// any other content is accepted as-is.
    pub fn new(
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let entity_type = entity_type.into();
        let entity_id = entity_id.into();
        validate_part("entity_type", &entity_type)?;
        validate_part("entity_id", &entity_id)?;
        Ok(Self {
            entity_type,
            entity_id,
        })
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Key of the given user viewing this entity
    pub fn viewer(&self, user_id: Snowflake) -> ViewerKey {
        ViewerKey {
            entity: self.clone(),
            user_id,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.entity_id)
    }
}

fn validate_part(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::InvalidEntityKey(format!("{field} must not be empty")));
    }
    if value.len() > MAX_KEY_LENGTH {
        return Err(DomainError::InvalidEntityKey(format!(
            "{field} exceeds {MAX_KEY_LENGTH} bytes"
        )));
    }
    Ok(())
}

/// Uniqueness key of a viewer record: (entity_type, entity_id, user_id)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewerKey {
    pub entity: EntityKey,
    pub user_id: Snowflake,
}

impl ViewerKey {
    pub fn new(entity: EntityKey, user_id: Snowflake) -> Self {
        Self { entity, user_id }
    }
}

impl fmt::Display for ViewerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity, self.user_id)
    }
}
