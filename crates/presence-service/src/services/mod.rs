//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

mod caller;
pub mod context;
pub mod error;
pub mod presence;
pub mod reaper;
pub mod user;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder, DEFAULT_REAP_BATCH_SIZE};
pub use error::{ServiceError, ServiceResult};
pub use presence::{PresenceService, ReapReport};
pub use reaper::ViewerReaper;
pub use user::UserService;
