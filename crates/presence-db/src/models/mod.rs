//! Database models - SQLx-compatible structs for PostgreSQL tables

mod audit_log;
mod user;
mod viewer;

pub use audit_log::AuditLogModel;
pub use user::UserModel;
pub use viewer::ViewerModel;
