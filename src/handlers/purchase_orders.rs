use super::common::{success_response, JsonResult};
use crate::{auth::AuthUser, entities::purchase_order, AppState};
use axum::{extract::State, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurchaseOrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub supplier_name: Option<String>,
    pub status: String,
    pub qc_required: bool,
    pub repair_required: bool,
    pub created_at: DateTime<Utc>,
}

impl From<purchase_order::Model> for PurchaseOrderResponse {
    fn from(model: purchase_order::Model) -> Self {
        Self {
            id: model.id,
            order_number: model.order_number,
            supplier_name: model.supplier_name,
            status: model.status,
            qc_required: model.qc_required,
            repair_required: model.repair_required,
            created_at: model.created_at,
        }
    }
}

/// List purchase orders awaiting receipt
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/pending",
    responses(
        (status = 200, description = "Pending purchase orders", body = crate::ApiResponse<Vec<PurchaseOrderResponse>>),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "purchase-orders"
)]
pub async fn list_pending_purchase_orders(
    State(state): State<AppState>,
    _user: AuthUser,
) -> JsonResult<Vec<PurchaseOrderResponse>> {
    let orders = state.services.purchase_orders.list_pending().await?;
    Ok(success_response(
        orders.into_iter().map(PurchaseOrderResponse::from).collect(),
    ))
}

pub fn purchase_order_routes() -> Router<AppState> {
    Router::new().route("/pending", get(list_pending_purchase_orders))
}
