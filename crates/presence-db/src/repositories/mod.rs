//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in presence-core.

mod audit_log;
mod error;
mod user;
mod viewer;

pub use audit_log::PgAuditLogRepository;
pub use user::PgUserRepository;
pub use viewer::PgViewerRepository;
