//! # presence-cache
//!
//! Redis backend for the viewer registry.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Viewer Store**: `ViewerRepository` over per-entity hashes plus a
//!   global activity index, mutated through atomic Lua scripts
//!
//! ## Example
//!
//! ```ignore
//! use presence_cache::{RedisPool, RedisPoolConfig, RedisViewerRepository};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let viewers = RedisViewerRepository::new(pool);
//! ```

pub mod pool;
pub mod viewers;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool};

// Re-export viewer store
pub use viewers::{RedisViewerRepository, ACTIVITY_INDEX_KEY, VIEWERS_PREFIX};
