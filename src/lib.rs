//! StateSet Intake
//!
//! Receiving service for mobile devices: operators scan IMEIs or serial
//! numbers into a session, the service classifies and validates each device,
//! packs it into 50-unit trays and commits the batch against a purchase order.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod intake;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    extract::{FromRef, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{auth::TokenVerifier, db::DbPool, events::EventSender};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub auth: Arc<TokenVerifier>,
    pub event_sender: Arc<EventSender>,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: config::AppConfig, event_sender: EventSender) -> Self {
        let event_sender = Arc::new(event_sender);
        let services = handlers::AppServices::new(db.clone(), event_sender.clone(), &config);
        let auth = Arc::new(TokenVerifier::from_config(&config));
        Self {
            db,
            config,
            auth,
            event_sender,
            services,
        }
    }
}

impl FromRef<AppState> for Arc<TokenVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Versioned API routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .nest("/intake", handlers::intake::intake_routes())
        .nest(
            "/purchase-orders",
            handlers::purchase_orders::purchase_order_routes(),
        )
        .nest(
            "/storage-locations",
            handlers::storage_locations::storage_location_routes(),
        )
        .nest("/tac-codes", handlers::catalog::tac_code_routes())
        .nest(
            "/device-configurations",
            handlers::catalog::device_configuration_routes(),
        )
}

/// Full application router with request ids and HTTP tracing.
///
/// CORS, timeouts and Swagger UI are added by the server binary.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_v1_routes())
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

async fn api_status(State(state): State<AppState>) -> ApiResult<Value> {
    let status_data = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "stateset-intake",
        "environment": state.config.environment,
        "open_sessions": state.services.intake.sessions().len(),
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(State(state): State<AppState>) -> ApiResult<Value> {
    let db_status = match db::check_connection(&state.db).await {
        Ok(()) => "healthy",
        Err(_) => "unhealthy",
    };

    Ok(Json(ApiResponse::success(json!({
        "status": db_status,
        "checks": { "database": db_status },
        "timestamp": Utc::now().to_rfc3339(),
    }))))
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_carries_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("scan-42"), async {
                ApiResponse::success(3usize)
            })
            .await;

        assert!(response.success);
        assert_eq!(response.data, Some(3));
        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("scan-42"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[test]
    fn error_response_has_no_data() {
        let response = ApiResponse::<()>::error("Please select a purchase order".into());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(
            response.message.as_deref(),
            Some("Please select a purchase order")
        );
        // Outside a request scope there is no id to report.
        assert!(response.meta.expect("metadata expected").request_id.is_none());
    }
}
