use super::common::{created_response, success_response, validate_input, CreatedResult, JsonResult};
use crate::{
    auth::AuthUser,
    intake::{DevicePatch, IdentifierKind, InitialAttributes, IntakeSessionView},
    services::intake::{DeviceOutcome, SubmitReceipt},
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OpenSessionRequest {
    pub kind: IdentifierKind,
    pub purchase_order_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectPurchaseOrderRequest {
    /// `null` clears the selection
    pub purchase_order_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ScanDeviceRequest {
    /// Raw scanner input; surrounding whitespace is ignored
    #[validate(length(max = 64))]
    pub identifier: String,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[validate(length(max = 50))]
    pub storage: Option<String>,
    #[validate(length(max = 20))]
    pub grade: Option<String>,
    #[serde(default)]
    pub qc_required: bool,
    #[serde(default)]
    pub repair_required: bool,
}

impl ScanDeviceRequest {
    fn into_parts(self) -> (String, InitialAttributes) {
        (
            self.identifier,
            InitialAttributes {
                color: self.color,
                storage: self.storage,
                grade: self.grade,
                qc_required: self.qc_required,
                repair_required: self.repair_required,
            },
        )
    }
}

/// Open an intake session
#[utoipa::path(
    post,
    path = "/api/v1/intake/sessions",
    request_body = OpenSessionRequest,
    responses(
        (status = 201, description = "Session opened", body = crate::ApiResponse<IntakeSessionView>),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "intake"
)]
pub async fn open_session(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<OpenSessionRequest>,
) -> CreatedResult<IntakeSessionView> {
    let view = state
        .services
        .intake
        .open_session(&user, payload.kind, payload.purchase_order_id)
        .await?;
    Ok(created_response(view))
}

/// Current state of a session
#[utoipa::path(
    get,
    path = "/api/v1/intake/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session", body = crate::ApiResponse<IntakeSessionView>),
        (status = 404, description = "Session not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "intake"
)]
pub async fn get_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> JsonResult<IntakeSessionView> {
    let view = state.services.intake.get_session(&user, id)?;
    Ok(success_response(view))
}

/// Select or clear the session's purchase order
#[utoipa::path(
    put,
    path = "/api/v1/intake/sessions/{id}/purchase-order",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = SelectPurchaseOrderRequest,
    responses(
        (status = 200, description = "Purchase order selected", body = crate::ApiResponse<IntakeSessionView>),
        (status = 404, description = "Session or purchase order not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "intake"
)]
pub async fn select_purchase_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectPurchaseOrderRequest>,
) -> JsonResult<IntakeSessionView> {
    let view = state
        .services
        .intake
        .select_purchase_order(&user, id, payload.purchase_order_id)
        .await?;
    Ok(success_response(view))
}

/// Scan one identifier into the session
#[utoipa::path(
    post,
    path = "/api/v1/intake/sessions/{id}/devices",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = ScanDeviceRequest,
    responses(
        (status = 201, description = "Device added; check `alert` for attribute problems", body = crate::ApiResponse<DeviceOutcome>),
        (status = 400, description = "Empty or malformed identifier", body = crate::errors::ErrorResponse),
        (status = 409, description = "Already scanned in this session, already in inventory, or session is being submitted", body = crate::errors::ErrorResponse),
        (status = 422, description = "No tray numbers left for this session", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "intake"
)]
pub async fn scan_device(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScanDeviceRequest>,
) -> CreatedResult<DeviceOutcome> {
    validate_input(&payload)?;
    let (identifier, attributes) = payload.into_parts();
    let outcome = state
        .services
        .intake
        .scan(&user, id, &identifier, attributes)
        .await?;
    Ok(created_response(outcome))
}

/// Edit a scanned device's attributes
#[utoipa::path(
    patch,
    path = "/api/v1/intake/sessions/{id}/devices/{index}",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("index" = usize, Path, description = "Zero-based position in the session")
    ),
    request_body = DevicePatch,
    responses(
        (status = 200, description = "Device updated", body = crate::ApiResponse<DeviceOutcome>),
        (status = 404, description = "No device at that position", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "intake"
)]
pub async fn edit_device(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(payload): Json<DevicePatch>,
) -> JsonResult<DeviceOutcome> {
    validate_input(&payload)?;
    let outcome = state
        .services
        .intake
        .edit_device(&user, id, index, payload)
        .await?;
    Ok(success_response(outcome))
}

/// Remove a device; later devices move up and trays are recomputed
#[utoipa::path(
    delete,
    path = "/api/v1/intake/sessions/{id}/devices/{index}",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("index" = usize, Path, description = "Zero-based position in the session")
    ),
    responses(
        (status = 200, description = "Device removed", body = crate::ApiResponse<IntakeSessionView>),
        (status = 404, description = "No device at that position", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "intake"
)]
pub async fn remove_device(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, index)): Path<(Uuid, usize)>,
) -> JsonResult<IntakeSessionView> {
    let view = state.services.intake.remove_device(&user, id, index)?;
    Ok(success_response(view))
}

/// Commit every device in the session against its purchase order
#[utoipa::path(
    post,
    path = "/api/v1/intake/sessions/{id}/submit",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Devices committed; the session is closed", body = crate::ApiResponse<SubmitReceipt>),
        (status = 400, description = "Missing purchase order, no devices, or unresolved validation errors", body = crate::errors::ErrorResponse),
        (status = 409, description = "A device was received elsewhere meanwhile, or the session is already being submitted", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "intake"
)]
pub async fn submit_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> JsonResult<SubmitReceipt> {
    let receipt = state.services.intake.submit(&user, id).await?;
    info!(
        user_id = %user.user_id,
        session_id = %id,
        devices = receipt.devices_committed,
        "Intake session submitted"
    );
    Ok(success_response(receipt))
}

/// Discard a session without writing anything
#[utoipa::path(
    delete,
    path = "/api/v1/intake/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Session not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "intake"
)]
pub async fn discard_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, crate::errors::ServiceError> {
    state.services.intake.discard(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn intake_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(open_session))
        .route("/sessions/:id", get(get_session).delete(discard_session))
        .route("/sessions/:id/purchase-order", put(select_purchase_order))
        .route("/sessions/:id/devices", post(scan_device))
        .route(
            "/sessions/:id/devices/:index",
            patch(edit_device).delete(remove_device),
        )
        .route("/sessions/:id/submit", post(submit_session))
}
