use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "StateSet Intake API",
        version = "1.0.0",
        description = r#"
# StateSet Device Intake API

Receiving workflow for cellular and serialized devices.

1. Open a session for cellular (IMEI) or serial devices, optionally with a purchase order.
2. Scan identifiers. Each IMEI is checked (15 digits), classified by its TAC and validated
   against the model's allowed colors and storage options. Devices are packed into trays
   of 50 in scan order.
3. Fix flagged devices, remove mistakes, pick the purchase order.
4. Submit. Every device is written in one transaction; nothing is written on failure.

## Authentication

All intake endpoints require a bearer JWT:

```
Authorization: Bearer <your-jwt-token>
```

## Errors

Errors use a single body shape; `message` is the text to show the operator:

```json
{
  "error": "Bad Request",
  "message": "Please select a purchase order",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        contact(
            name = "StateSet Support",
            email = "support@stateset.io",
            url = "https://stateset.io"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "intake", description = "Scan sessions and submission"),
        (name = "purchase-orders", description = "Purchase orders awaiting receipt"),
        (name = "storage-locations", description = "Tray allocation"),
        (name = "catalog", description = "TAC codes and device configurations")
    ),
    paths(
        // Intake
        crate::handlers::intake::open_session,
        crate::handlers::intake::get_session,
        crate::handlers::intake::select_purchase_order,
        crate::handlers::intake::scan_device,
        crate::handlers::intake::edit_device,
        crate::handlers::intake::remove_device,
        crate::handlers::intake::submit_session,
        crate::handlers::intake::discard_session,

        // Purchase orders
        crate::handlers::purchase_orders::list_pending_purchase_orders,

        // Storage locations
        crate::handlers::storage_locations::next_tray,

        // Catalog
        crate::handlers::catalog::get_tac_code,
        crate::handlers::catalog::get_device_configuration,
        crate::handlers::catalog::upsert_device_configuration,
    ),
    components(
        schemas(
            // Intake types
            crate::handlers::intake::OpenSessionRequest,
            crate::handlers::intake::SelectPurchaseOrderRequest,
            crate::handlers::intake::ScanDeviceRequest,
            crate::intake::IntakeSessionView,
            crate::intake::DeviceEntry,
            crate::intake::DevicePatch,
            crate::intake::DeviceStatus,
            crate::intake::IdentifierKind,
            crate::intake::TrayOccupancy,
            crate::intake::AlertCue,
            crate::services::intake::DeviceOutcome,
            crate::services::intake::SubmitReceipt,

            // Purchase orders and trays
            crate::handlers::purchase_orders::PurchaseOrderResponse,
            crate::handlers::storage_locations::NextTrayResponse,

            // Catalog types
            crate::handlers::catalog::TacCodeResponse,
            crate::intake::DeviceConfiguration,
            crate::services::catalog::UpsertDeviceConfiguration,

            // Error types
            crate::errors::ErrorResponse
        )
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDocV1;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
