//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use presence_core::{Snowflake, User, ViewerInfo};

use super::responses::{ActiveViewerResponse, CurrentUserResponse, ProvisionResponse};

impl From<ViewerInfo> for ActiveViewerResponse {
    fn from(info: ViewerInfo) -> Self {
        Self {
            user_id: info.user_id.to_string(),
            user_name: info.user_name,
            user_avatar: info.user_avatar,
            last_active_at: info.last_active_at.timestamp_millis(),
        }
    }
}

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            role: user.role,
            permissions: user.permissions,
            member_number: user.member_number,
            profile_completed: user.profile_completed,
            created_at: user.created_at.timestamp_millis(),
        }
    }
}

impl From<User> for CurrentUserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<Snowflake> for ProvisionResponse {
    fn from(user_id: Snowflake) -> Self {
        Self {
            user_id: user_id.to_string(),
        }
    }
}
