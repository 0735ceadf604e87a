//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility and
//! timestamps as Unix milliseconds.

use chrono::{DateTime, Utc};
use serde::Serialize;

use presence_core::{MemberNumber, Permissions, Role};

// ============================================================================
// Viewer Responses
// ============================================================================

/// Another user currently viewing the same entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveViewerResponse {
    pub user_id: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    /// Unix milliseconds of the last heartbeat
    pub last_active_at: i64,
}

// ============================================================================
// User Responses
// ============================================================================

/// The caller's own account
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: Role,
    pub permissions: Permissions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_number: Option<MemberNumber>,
    pub profile_completed: bool,
    pub created_at: i64,
}

/// Result of provisioning the caller's account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionResponse {
    pub user_id: String,
}

/// Result of assigning member numbers to existing accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackfillResponse {
    pub message: String,
    pub updated: u64,
}

impl BackfillResponse {
    pub fn new(updated: u64) -> Self {
        Self {
            message: format!("Successfully added member numbers to {updated} users"),
            updated,
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    /// Present only when viewers are stored in Redis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis: Option<String>,
}

fn health_label(healthy: bool) -> String {
    if healthy { "healthy" } else { "unhealthy" }.to_string()
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: Option<bool>) -> Self {
        let all_healthy = database_healthy && redis_healthy.unwrap_or(true);
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: health_label(database_healthy),
                redis: redis_healthy.map(health_label),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
