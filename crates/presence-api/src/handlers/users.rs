//! User handlers
//!
//! Provisioning and lookup of the caller's own account.

use axum::{extract::State, Json};
use presence_service::{
    dto::{CurrentUserResponse, ProvisionResponse},
    UserService,
};

use crate::extractors::CallerToken;
use crate::response::ApiResult;
use crate::state::AppState;

/// Create the caller's account if needed and return its id
///
/// POST /users/@me
pub async fn provision_current_user(
    State(state): State<AppState>,
    caller: CallerToken,
) -> ApiResult<Json<ProvisionResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.provision_current_user(caller.token()).await?;
    Ok(Json(response))
}

/// Get the caller's account (`null` until provisioned)
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    caller: CallerToken,
) -> ApiResult<Json<Option<CurrentUserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.get_current_user(caller.token()).await?;
    Ok(Json(response))
}
