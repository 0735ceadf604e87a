//! Administrative handlers

use axum::{extract::State, Json};
use presence_service::{dto::BackfillResponse, UserService};

use crate::extractors::CallerToken;
use crate::response::ApiResult;
use crate::state::AppState;

/// Assign member numbers to accounts that have none (owners only)
///
/// POST /admin/member-numbers
pub async fn backfill_member_numbers(
    State(state): State<AppState>,
    caller: CallerToken,
) -> ApiResult<Json<BackfillResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.backfill_member_numbers(caller.token()).await?;
    Ok(Json(response))
}
