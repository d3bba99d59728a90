mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{imei, response_json, TestApp};

#[tokio::test]
async fn requests_without_a_valid_token_are_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/purchase-orders/pending", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::GET,
            "/api/v1/purchase-orders/pending",
            None,
            Some("not-a-jwt"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn responses_echo_request_id() {
    let app = TestApp::new().await;
    let response = app
        .request_authenticated(Method::GET, "/api/v1/status", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("request id header");
    let body = response_json(response).await;
    assert_eq!(body["meta"]["request_id"], header);
}

#[tokio::test]
async fn scan_and_submit_over_http() {
    let app = TestApp::new().await;
    app.seed_iphone_12().await;
    let po = app.pending_purchase_order("PO-3001").await;

    let response = app
        .request_authenticated(Method::GET, "/api/v1/purchase-orders/pending", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"][0]["order_number"], "PO-3001");

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/intake/sessions",
            Some(json!({ "kind": "cellular" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    let session_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["starting_tray"], "TRAY001");
    assert_eq!(body["data"]["can_submit"], false);

    let devices = format!("/api/v1/intake/sessions/{session_id}/devices");

    let response = app
        .request_authenticated(
            Method::POST,
            &devices,
            Some(json!({ "identifier": "35693803", "color": "Black" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["message"], "IMEI must be exactly 15 digits");

    let response = app
        .request_authenticated(
            Method::POST,
            &devices,
            Some(json!({ "identifier": imei(1), "color": "Green", "storage": "64GB" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["alert"], "error");
    assert_eq!(body["data"]["device"]["manufacturer"], "Apple");
    assert_eq!(body["data"]["device"]["tray"], "TRAY001");

    let response = app
        .request_authenticated(
            Method::POST,
            &devices,
            Some(json!({ "identifier": imei(1) })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert_eq!(body["message"], "This IMEI has already been scanned");

    let submit = format!("/api/v1/intake/sessions/{session_id}/submit");
    let response = app.request_authenticated(Method::POST, &submit, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Please select a purchase order");

    let response = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/intake/sessions/{session_id}/purchase-order"),
            Some(json!({ "purchase_order_id": po })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request_authenticated(Method::POST, &submit, None).await;
    let body = response_json(response).await;
    assert_eq!(body["message"], "Please fix validation errors before submitting");

    let response = app
        .request_authenticated(
            Method::PATCH,
            &format!("{devices}/0"),
            Some(json!({ "color": "blue", "grade": "A" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["data"]["device"]["validation_error"].is_null());
    assert!(body["data"]["alert"].is_null());
    assert_eq!(body["data"]["session"]["can_submit"], true);

    let response = app.request_authenticated(Method::POST, &submit, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["devices_committed"], 1);
    assert_eq!(body["data"]["trays"], json!(["TRAY001"]));

    let response = app
        .request_authenticated(
            Method::GET,
            "/api/v1/storage-locations/next-tray",
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["next_tray"], "TRAY002");
    assert_eq!(body["data"]["capacity"], 50);
}

#[tokio::test]
async fn removing_a_device_renumbers_the_rest() {
    let app = TestApp::new().await;
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/intake/sessions",
            Some(json!({ "kind": "serial" })),
        )
        .await;
    let body = response_json(response).await;
    let session_id = body["data"]["id"].as_str().unwrap().to_string();
    let devices = format!("/api/v1/intake/sessions/{session_id}/devices");

    for serial in ["SN-A", "SN-B", "SN-C"] {
        let response = app
            .request_authenticated(Method::POST, &devices, Some(json!({ "identifier": serial })))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .request_authenticated(Method::DELETE, &format!("{devices}/0"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let remaining: Vec<_> = body["data"]["devices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["identifier"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(remaining, ["SN-B", "SN-C"]);

    let response = app
        .request_authenticated(Method::DELETE, &format!("{devices}/7"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request_authenticated(
            Method::DELETE,
            &format!("/api/v1/intake/sessions/{session_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn another_operator_cannot_see_a_session() {
    let app = TestApp::new().await;
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/intake/sessions",
            Some(json!({ "kind": "cellular" })),
        )
        .await;
    let body = response_json(response).await;
    let session_id = body["data"]["id"].as_str().unwrap().to_string();

    let stranger = app.token_for("operator-2");
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/intake/sessions/{session_id}"),
            None,
            Some(&stranger),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_endpoints() {
    let app = TestApp::new().await;
    app.seed_iphone_12().await;

    let response = app
        .request_authenticated(Method::GET, "/api/v1/tac-codes/35693803", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["model"], "iPhone 12");

    let response = app
        .request_authenticated(Method::GET, "/api/v1/tac-codes/11111111", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request_authenticated(Method::GET, "/api/v1/tac-codes/12ab", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request_authenticated(
            Method::PUT,
            "/api/v1/device-configurations",
            Some(json!({
                "manufacturer": "Samsung",
                "model": "Galaxy S21",
                "colors": ["Phantom Gray", " ", "phantom gray", "Phantom White"],
                "storage_options": ["128GB"]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request_authenticated(
            Method::GET,
            "/api/v1/device-configurations?manufacturer=Samsung&model=Galaxy%20S21",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(
        body["data"]["colors"],
        json!(["Phantom Gray", "Phantom White"])
    );
}
