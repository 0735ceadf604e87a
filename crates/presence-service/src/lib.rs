//! # presence-service
//!
//! Application layer: the presence registry, user provisioning, the reap
//! scheduler and the DTOs they return.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use services::{
    PresenceService, ReapReport, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, UserService, ViewerReaper,
};
