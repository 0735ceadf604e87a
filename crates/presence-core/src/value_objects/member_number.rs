//! Member number - human-facing account number (`M-00001`)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Sequential member number, rendered as `M-` followed by at least five digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberNumber(u32);

impl MemberNumber {
    const PREFIX: &'static str = "M-";

    /// Create from the sequence value (must be at least 1)
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::ValidationError(
                "member number must start at 1".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Member number assigned to the n-th account, where `existing` accounts precede it
    pub fn after(existing: u64) -> Result<Self, DomainError> {
        let value = u32::try_from(existing + 1).map_err(|_| {
            DomainError::ValidationError("member number space exhausted".to_string())
        })?;
        Self::new(value)
    }

    /// The following member number
    pub fn next(self) -> Result<Self, DomainError> {
        Self::after(u64::from(self.0))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MemberNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:05}", Self::PREFIX, self.0)
    }
}

impl FromStr for MemberNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(Self::PREFIX)
            .filter(|d| d.len() >= 5 && d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| DomainError::ValidationError(format!("invalid member number: {s}")))?;
        let value = digits
            .parse::<u32>()
            .map_err(|_| DomainError::ValidationError(format!("invalid member number: {s}")))?;
        Self::new(value)
    }
}

impl TryFrom<String> for MemberNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MemberNumber> for String {
    fn from(number: MemberNumber) -> Self {
        number.to_string()
    }
}
