//! Viewer handlers
//!
//! Heartbeat, release and snapshot of the viewers of one entity.

use axum::{extract::State, Json};
use presence_service::{dto::ActiveViewerResponse, PresenceService};

use crate::extractors::{CallerToken, EntityPath, ValidPath};
use crate::response::{ApiError, ApiResult, NoContent};
use crate::state::AppState;

/// Record that the caller is viewing the entity
///
/// POST /viewers/{entity_type}/{entity_id}
pub async fn register_viewer(
    State(state): State<AppState>,
    caller: CallerToken,
    ValidPath(path): ValidPath<EntityPath>,
) -> ApiResult<NoContent> {
    let service = PresenceService::new(state.service_context());
    service
        .register_viewer(&path.entity_type, &path.entity_id, caller.token())
        .await?;
    Ok(NoContent)
}

/// Remove the caller's viewer record (always succeeds)
///
/// DELETE /viewers/{entity_type}/{entity_id}
pub async fn unregister_viewer(
    State(state): State<AppState>,
    caller: CallerToken,
    path: Result<ValidPath<EntityPath>, ApiError>,
) -> NoContent {
    if let Ok(ValidPath(path)) = path {
        let service = PresenceService::new(state.service_context());
        service
            .unregister_viewer(&path.entity_type, &path.entity_id, caller.token())
            .await;
    }
    NoContent
}

/// Other users currently viewing the entity
///
/// GET /viewers/{entity_type}/{entity_id}
pub async fn get_active_viewers(
    State(state): State<AppState>,
    caller: CallerToken,
    path: Result<ValidPath<EntityPath>, ApiError>,
) -> Json<Vec<ActiveViewerResponse>> {
    let viewers = match path {
        Ok(ValidPath(path)) => {
            PresenceService::new(state.service_context())
                .get_active_viewers(&path.entity_type, &path.entity_id, caller.token())
                .await
        }
        Err(_) => Vec::new(),
    };
    Json(viewers)
}
