//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{routing::get, routing::post, Router};

use crate::handlers::{admin, health, users, viewers};
use crate::state::AppState;

/// Create the main API router (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(viewer_routes())
        .merge(user_routes())
        .merge(admin_routes())
}

/// Viewer registry routes
fn viewer_routes() -> Router<AppState> {
    Router::new().route(
        "/viewers/:entity_type/:entity_id",
        get(viewers::get_active_viewers)
            .post(viewers::register_viewer)
            .delete(viewers::unregister_viewer),
    )
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/users/@me",
        get(users::get_current_user).post(users::provision_current_user),
    )
}

/// Administrative routes
fn admin_routes() -> Router<AppState> {
    Router::new().route(
        "/admin/member-numbers",
        post(admin::backfill_member_numbers),
    )
}
