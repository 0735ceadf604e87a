//! Account roles and permission flags
//!
//! Permissions are modelled as bitflags in memory and stored/serialized as a
//! list of snake_case names (`["view_users", "ban_users"]`).

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Account-level permission flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u32 {
        const VIEW_USERS           = 1 << 0;
        const EDIT_USERS           = 1 << 1;
        const DELETE_USERS         = 1 << 2;
        const BAN_USERS            = 1 << 3;
        const MANAGE_ROLES         = 1 << 4;
        const MODERATE_FORUMS      = 1 << 5;
        const MODERATE_MARKETPLACE = 1 << 6;
        const MANAGE_SUBSCRIPTIONS = 1 << 7;
        const VIEW_ANALYTICS       = 1 << 8;
    }
}

/// Stable names, in bit order
const NAMES: [(&str, Permissions); 9] = [
    ("view_users", Permissions::VIEW_USERS),
    ("edit_users", Permissions::EDIT_USERS),
    ("delete_users", Permissions::DELETE_USERS),
    ("ban_users", Permissions::BAN_USERS),
    ("manage_roles", Permissions::MANAGE_ROLES),
    ("moderate_forums", Permissions::MODERATE_FORUMS),
    ("moderate_marketplace", Permissions::MODERATE_MARKETPLACE),
    ("manage_subscriptions", Permissions::MANAGE_SUBSCRIPTIONS),
    ("view_analytics", Permissions::VIEW_ANALYTICS),
];

impl Permissions {
    /// Check if the permission set contains all of the required permissions
    #[inline]
    pub fn has(&self, permission: Permissions) -> bool {
        self.contains(permission)
    }

    /// Look up a single permission by its stored name
    pub fn from_stored_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, flag)| *flag)
    }

    /// Build a set from stored names
    ///
    /// Unknown names are ignored so that rows written by newer versions still load.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| Self::from_stored_name(name.as_ref()))
            .fold(Permissions::empty(), |acc, p| acc | p)
    }

    /// Names of every permission in the set, in bit order
    pub fn names(&self) -> Vec<&'static str> {
        NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::empty()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join(","))
    }
}

impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.names().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(Permissions::from_names(names))
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    #[default]
    Member,
}

impl Role {
    /// Permissions granted to a freshly provisioned account with this role
    pub fn default_permissions(&self) -> Permissions {
        match self {
            Self::Owner => Permissions::all(),
            Self::Admin => {
                Permissions::VIEW_USERS
                    | Permissions::EDIT_USERS
                    | Permissions::BAN_USERS
                    | Permissions::MODERATE_FORUMS
                    | Permissions::MODERATE_MARKETPLACE
                    | Permissions::VIEW_ANALYTICS
            }
            Self::Member => Permissions::empty(),
        }
    }

    #[inline]
    pub fn is_owner(&self) -> bool {
        matches!(self, Self::Owner)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}
