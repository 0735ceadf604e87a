//! Domain entities - core business objects

mod audit_log;
mod user;
mod viewer;

pub use audit_log::AuditLog;
pub use user::{User, UNKNOWN_USER_NAME};
pub use viewer::{ViewerInfo, ViewerRecord};
