//! Test fixtures and response shapes
//!
//! Provides unique test data and the JSON bodies returned by the API.

use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Token subject that is unique across test runs
pub fn unique_subject(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{prefix}-{nanos}-{}", unique_suffix())
}

/// Entity id that no other test touches
pub fn unique_entity_path() -> String {
    format!("/api/v1/viewers/doc/{}", unique_subject("doc"))
}

/// POST /users/@me
#[derive(Debug, Deserialize)]
pub struct ProvisionResponse {
    pub user_id: String,
}

/// GET /users/@me
#[derive(Debug, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub name: Option<String>,
    pub role: String,
    pub permissions: Vec<String>,
    pub member_number: Option<String>,
    pub profile_completed: bool,
}

/// GET /viewers/{entity_type}/{entity_id}
#[derive(Debug, Deserialize)]
pub struct ActiveViewer {
    pub user_id: String,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub last_active_at: i64,
}

/// Error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
