//! Entity to model mappers
//!
//! Conversions between domain entities (presence-core) and database models.
//! - `From`/`TryFrom<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert` structs: Prepare entity data for database writes

mod audit_log;
mod user;
mod viewer;

pub use user::{parse_role, UserInsert};
