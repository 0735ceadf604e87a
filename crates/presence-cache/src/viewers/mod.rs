//! Viewer records in Redis.

mod store;

pub use store::{RedisViewerRepository, ACTIVITY_INDEX_KEY, VIEWERS_PREFIX};
