//! Ports implemented by the infrastructure layer

mod clock;
mod identity;
mod repositories;

pub use clock::{Clock, SystemClock};
pub use identity::{Identity, IdentityResolver};
pub use repositories::{
    AuditLogRepository, HeartbeatOutcome, RepoResult, UserRepository, ViewerRepository,
};
