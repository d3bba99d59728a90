use super::common::{success_response, JsonResult};
use crate::{auth::AuthUser, AppState};
use axum::{extract::State, routing::get, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NextTrayResponse {
    /// Code the next session's first tray will get, e.g. TRAY011
    pub next_tray: String,
    pub tray_number: u32,
    pub capacity: usize,
}

/// Tray the next intake session starts filling
#[utoipa::path(
    get,
    path = "/api/v1/storage-locations/next-tray",
    responses(
        (status = 200, description = "Next tray", body = crate::ApiResponse<NextTrayResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "storage-locations"
)]
pub async fn next_tray(
    State(state): State<AppState>,
    _user: AuthUser,
) -> JsonResult<NextTrayResponse> {
    let allocator = state
        .services
        .storage_locations
        .next_tray_allocator()
        .await?;
    Ok(success_response(NextTrayResponse {
        next_tray: allocator.start_code(),
        tray_number: allocator.start(),
        capacity: allocator.capacity(),
    }))
}

pub fn storage_location_routes() -> Router<AppState> {
    Router::new().route("/next-tray", get(next_tray))
}
