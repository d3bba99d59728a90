use super::common::{success_response, validate_input, JsonResult};
use crate::{
    auth::AuthUser, entities::tac_code, intake::DeviceConfiguration,
    services::catalog::UpsertDeviceConfiguration, AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TacCodeResponse {
    pub tac_code: String,
    pub manufacturer: String,
    pub model: String,
}

impl From<tac_code::Model> for TacCodeResponse {
    fn from(model: tac_code::Model) -> Self {
        Self {
            tac_code: model.tac_code,
            manufacturer: model.manufacturer,
            model: model.model_name,
        }
    }
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct DeviceConfigurationQuery {
    #[validate(length(min = 1, max = 100))]
    pub manufacturer: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
}

/// Look up a Type Allocation Code
#[utoipa::path(
    get,
    path = "/api/v1/tac-codes/{tac}",
    params(("tac" = String, Path, description = "First 8 digits of an IMEI")),
    responses(
        (status = 200, description = "TAC found", body = crate::ApiResponse<TacCodeResponse>),
        (status = 400, description = "Malformed TAC", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown TAC", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn get_tac_code(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(tac): Path<String>,
) -> JsonResult<TacCodeResponse> {
    let row = state.services.catalog.get_tac(tac.trim()).await?;
    Ok(success_response(row.into()))
}

/// Allowed colors and storage options for a model
#[utoipa::path(
    get,
    path = "/api/v1/device-configurations",
    params(DeviceConfigurationQuery),
    responses(
        (status = 200, description = "Configuration found", body = crate::ApiResponse<DeviceConfiguration>),
        (status = 404, description = "No configuration for this model", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn get_device_configuration(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<DeviceConfigurationQuery>,
) -> JsonResult<DeviceConfiguration> {
    validate_input(&query)?;
    let config = state
        .services
        .catalog
        .get_configuration(&query.manufacturer, &query.model)
        .await?;
    Ok(success_response(config))
}

/// Create or replace a model's configuration
#[utoipa::path(
    put,
    path = "/api/v1/device-configurations",
    request_body = UpsertDeviceConfiguration,
    responses(
        (status = 200, description = "Configuration saved", body = crate::ApiResponse<DeviceConfiguration>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "catalog"
)]
pub async fn upsert_device_configuration(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpsertDeviceConfiguration>,
) -> JsonResult<DeviceConfiguration> {
    validate_input(&payload)?;
    let config = state.services.catalog.upsert_configuration(payload).await?;
    info!(
        user_id = %user.user_id,
        manufacturer = %config.manufacturer,
        model = %config.model,
        "Device configuration updated"
    );
    Ok(success_response(config))
}

pub fn tac_code_routes() -> Router<AppState> {
    Router::new().route("/:tac", get(get_tac_code))
}

pub fn device_configuration_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_device_configuration).put(upsert_device_configuration),
    )
}
