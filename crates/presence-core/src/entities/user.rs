//! User entity - a provisioned account
//!
//! Users are created on first sign-in from the identity provider's claims and
//! are referenced (never owned) by viewer records.

use chrono::{DateTime, Utc};

use crate::value_objects::{MemberNumber, Permissions, Role, Snowflake};

/// Placeholder shown when a user has no name or no longer exists
pub const UNKNOWN_USER_NAME: &str = "Unknown";

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    /// Stable identity-provider key (`issuer|subject`)
    pub token_identifier: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub role: Role,
    pub permissions: Permissions,
    pub member_number: Option<MemberNumber>,
    pub profile_completed: bool,
    pub account_access_restricted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account with the role's default permissions
    pub fn new(id: Snowflake, token_identifier: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id,
            token_identifier,
            name: None,
            email: None,
            avatar: None,
            role,
            permissions: role.default_permissions(),
            member_number: None,
            profile_completed: false,
            account_access_restricted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Name shown to other viewers
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_USER_NAME)
    }

    #[inline]
    pub fn is_owner(&self) -> bool {
        self.role.is_owner()
    }

    #[inline]
    pub fn has_permission(&self, permission: Permissions) -> bool {
        self.permissions.has(permission)
    }

    /// Assign a member number
    pub fn set_member_number(&mut self, number: MemberNumber) {
        self.member_number = Some(number);
        self.updated_at = Utc::now();
    }
}
