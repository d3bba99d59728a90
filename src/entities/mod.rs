pub mod cellular_device;
pub mod device_configuration;
pub mod purchase_order;
pub mod serial_device;
pub mod storage_location;
pub mod tac_code;
