//! Value objects - immutable types that represent domain concepts

mod entity_key;
mod member_number;
mod permissions;
mod presence_windows;
mod snowflake;

pub use entity_key::{EntityKey, ViewerKey, MAX_KEY_LENGTH};
pub use member_number::MemberNumber;
pub use permissions::{Permissions, Role};
pub use presence_windows::PresenceWindows;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
