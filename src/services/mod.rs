pub mod catalog;
pub mod devices;
pub mod intake;
pub mod purchase_orders;
pub mod sessions;
pub mod storage_locations;

pub use catalog::CatalogService;
pub use devices::DeviceService;
pub use intake::IntakeService;
pub use purchase_orders::PurchaseOrderService;
pub use sessions::SessionStore;
pub use storage_locations::StorageLocationService;
