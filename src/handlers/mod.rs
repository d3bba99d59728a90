pub mod catalog;
pub mod common;
pub mod intake;
pub mod purchase_orders;
pub mod storage_locations;

use crate::{
    config::AppConfig,
    db::DbPool,
    events::EventSender,
    services::{
        CatalogService, DeviceService, IntakeService, PurchaseOrderService, SessionStore,
        StorageLocationService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub purchase_orders: Arc<PurchaseOrderService>,
    pub storage_locations: Arc<StorageLocationService>,
    pub devices: Arc<DeviceService>,
    pub intake: Arc<IntakeService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, config: &AppConfig) -> Self {
        let settings = config.intake.clone();

        let catalog = Arc::new(CatalogService::new(db_pool.clone(), event_sender.clone()));
        let purchase_orders = Arc::new(PurchaseOrderService::new(db_pool.clone()));
        let storage_locations = Arc::new(StorageLocationService::new(
            db_pool.clone(),
            settings.tray_prefix.clone(),
            settings.tray_capacity,
        ));
        let devices = Arc::new(DeviceService::new(db_pool.clone()));
        let sessions = Arc::new(SessionStore::new());

        let intake = Arc::new(IntakeService::new(
            db_pool,
            catalog.clone(),
            storage_locations.clone(),
            devices.clone(),
            purchase_orders.clone(),
            sessions,
            event_sender,
            settings,
        ));

        Self {
            catalog,
            purchase_orders,
            storage_locations,
            devices,
            intake,
        }
    }
}
