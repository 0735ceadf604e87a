//! # presence-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations for users, viewers and audit logs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use presence_db::{create_pool, run_migrations, DatabaseConfig, PgViewerRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::new("postgres://localhost/presence")).await?;
//!     run_migrations(&pool, "./migrations").await?;
//!     let viewers = PgViewerRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgAuditLogRepository, PgUserRepository, PgViewerRepository};
