//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub token_identifier: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    /// `owner`, `admin` or `member`
    pub role: String,
    /// Permission names (TEXT[])
    pub permissions: Vec<String>,
    /// Formatted as `M-00001`
    pub member_number: Option<String>,
    pub profile_completed: bool,
    pub account_access_restricted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
