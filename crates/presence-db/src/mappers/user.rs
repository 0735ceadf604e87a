//! User entity <-> model mapper

use presence_core::entities::User;
use presence_core::value_objects::{MemberNumber, Permissions, Role, Snowflake};

use crate::models::UserModel;

/// Convert database role string to Role, defaulting to member
pub fn parse_role(role: &str) -> Role {
    role.parse().unwrap_or_default()
}

/// Convert UserModel to User entity
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            token_identifier: model.token_identifier,
            name: model.name,
            email: model.email,
            avatar: model.avatar,
            role: parse_role(&model.role),
            permissions: Permissions::from_names(&model.permissions),
            member_number: model
                .member_number
                .as_deref()
                .and_then(|n| n.parse::<MemberNumber>().ok()),
            profile_completed: model.profile_completed,
            account_access_restricted: model.account_access_restricted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// User entity values for database insertion
pub struct UserInsert<'a> {
    pub id: i64,
    pub token_identifier: &'a str,
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub avatar: Option<&'a str>,
    pub role: &'static str,
    pub permissions: Vec<&'static str>,
    pub member_number: Option<String>,
    pub profile_completed: bool,
    pub account_access_restricted: bool,
}

impl<'a> UserInsert<'a> {
    pub fn new(user: &'a User) -> Self {
        Self {
            id: user.id.into_inner(),
            token_identifier: &user.token_identifier,
            name: user.name.as_deref(),
            email: user.email.as_deref(),
            avatar: user.avatar.as_deref(),
            role: user.role.as_str(),
            permissions: user.permissions.names(),
            member_number: user.member_number.map(|n| n.to_string()),
            profile_completed: user.profile_completed,
            account_access_restricted: user.account_access_restricted,
        }
    }
}
