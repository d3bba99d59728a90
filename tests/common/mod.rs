#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use chrono::Utc;
use serde_json::Value;
use stateset_intake::{
    auth::{AuthUser, Claims},
    config::{AppConfig, IntakeSettings},
    db,
    events::{self, EventSender},
    services::{catalog::UpsertDeviceConfiguration, purchase_orders::CreatePurchaseOrder},
    AppState,
};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str =
    "k3Jd9_qLx2Vn8ZpR4tWm7YcB1sHf6GuE0aNiOjTkQrPlMvXwDyAzSbCeFgIhJ5oU";
pub const OPERATOR: &str = "operator-1";

/// TAC seeded by [`TestApp::seed_iphone_12`].
pub const IPHONE_12_TAC: &str = "35693803";

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_settings(IntakeSettings::default()).await
    }

    pub async fn with_settings(intake: IntakeSettings) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            TEST_JWT_SECRET.to_string(),
            "test".to_string(),
        );
        // One connection so every query sees the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.intake = intake;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_task = tokio::spawn(events::process_events(event_rx));
        let state = AppState::new(Arc::new(pool), cfg, EventSender::new(event_tx));
        let router = stateset_intake::build_router(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    pub fn operator(&self) -> AuthUser {
        Self::user(OPERATOR)
    }

    pub fn user(user_id: &str) -> AuthUser {
        AuthUser {
            user_id: user_id.to_string(),
            name: None,
        }
    }

    /// Signs a token the app's verifier accepts.
    pub fn token_for(&self, user_id: &str) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            name: Some("Receiving Operator".to_string()),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(1)).timestamp(),
            iss: self.state.config.auth_issuer.clone(),
            aud: self.state.config.auth_audience.clone(),
        };
        jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .expect("encode access token")
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Authenticated request as [`OPERATOR`].
    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response {
        let token = self.token_for(OPERATOR);
        self.request(method, uri, body, Some(&token)).await
    }

    pub async fn pending_purchase_order(&self, order_number: &str) -> Uuid {
        self.state
            .services
            .purchase_orders
            .create(CreatePurchaseOrder {
                order_number: order_number.to_string(),
                supplier_name: Some("Test Supplier".to_string()),
            })
            .await
            .expect("create purchase order")
            .id
    }

    /// Registers TAC 35693803 as an Apple iPhone 12 with a small configuration.
    pub async fn seed_iphone_12(&self) {
        let catalog = &self.state.services.catalog;
        catalog
            .register_tac(IPHONE_12_TAC, "Apple", "iPhone 12")
            .await
            .expect("register tac");
        catalog
            .upsert_configuration(UpsertDeviceConfiguration {
                manufacturer: "Apple".to_string(),
                model: "iPhone 12".to_string(),
                colors: vec!["Black".to_string(), "White".to_string(), "Blue".to_string()],
                storage_options: vec!["64GB".to_string(), "128GB".to_string()],
            })
            .await
            .expect("upsert configuration");
    }
}

/// A 15-digit IMEI under the given TAC.
pub fn imei_with_tac(tac: &str, n: usize) -> String {
    format!("{}{:07}", tac, n)
}

pub fn imei(n: usize) -> String {
    imei_with_tac(IPHONE_12_TAC, n)
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
