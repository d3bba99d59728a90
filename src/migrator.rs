use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_purchase_orders_table::Migration),
            Box::new(m20240301_000002_create_storage_locations_table::Migration),
            Box::new(m20240301_000003_create_tac_codes_table::Migration),
            Box::new(m20240301_000004_create_device_configurations_table::Migration),
            Box::new(m20240301_000005_create_cellular_devices_table::Migration),
            Box::new(m20240301_000006_create_serial_devices_table::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum PurchaseOrders {
    Table,
    Id,
    OrderNumber,
    SupplierName,
    Status,
    QcRequired,
    RepairRequired,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StorageLocations {
    Table,
    Id,
    LocationCode,
    LocationType,
    Capacity,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TacCodes {
    Table,
    Id,
    TacCode,
    Manufacturer,
    ModelName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DeviceConfigurations {
    Table,
    Id,
    Manufacturer,
    ModelName,
    Colors,
    StorageOptions,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CellularDevices {
    Table,
    Id,
    Imei,
    TacCodeId,
    Manufacturer,
    ModelName,
    Color,
    Storage,
    Grade,
    Status,
    StorageLocationId,
    PurchaseOrderId,
    QcRequired,
    RepairRequired,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SerialDevices {
    Table,
    Id,
    SerialNumber,
    Manufacturer,
    ModelName,
    Color,
    Storage,
    Grade,
    Status,
    StorageLocationId,
    PurchaseOrderId,
    QcRequired,
    RepairRequired,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

mod m20240301_000001_create_purchase_orders_table {
    use super::PurchaseOrders;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_purchase_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::OrderNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::SupplierName).string().null())
                        .col(
                            ColumnDef::new(PurchaseOrders::Status)
                                .string()
                                .not_null()
                                .default("pending"),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::QcRequired)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::RepairRequired)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_orders_status")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }
}

mod m20240301_000002_create_storage_locations_table {
    use super::StorageLocations;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_storage_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StorageLocations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StorageLocations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StorageLocations::LocationCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(StorageLocations::LocationType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StorageLocations::Capacity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StorageLocations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_storage_locations_type")
                        .table(StorageLocations::Table)
                        .col(StorageLocations::LocationType)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StorageLocations::Table).to_owned())
                .await
        }
    }
}

mod m20240301_000003_create_tac_codes_table {
    use super::TacCodes;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_tac_codes_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TacCodes::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(TacCodes::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(TacCodes::TacCode)
                                .string_len(8)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(TacCodes::Manufacturer).string().not_null())
                        .col(ColumnDef::new(TacCodes::ModelName).string().not_null())
                        .col(
                            ColumnDef::new(TacCodes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TacCodes::Table).to_owned())
                .await
        }
    }
}

mod m20240301_000004_create_device_configurations_table {
    use super::DeviceConfigurations;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000004_create_device_configurations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DeviceConfigurations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeviceConfigurations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeviceConfigurations::Manufacturer)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeviceConfigurations::ModelName)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeviceConfigurations::Colors).json().not_null())
                        .col(
                            ColumnDef::new(DeviceConfigurations::StorageOptions)
                                .json()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeviceConfigurations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeviceConfigurations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .unique()
                        .name("idx_device_configurations_manufacturer_model")
                        .table(DeviceConfigurations::Table)
                        .col(DeviceConfigurations::Manufacturer)
                        .col(DeviceConfigurations::ModelName)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DeviceConfigurations::Table).to_owned())
                .await
        }
    }
}

mod m20240301_000005_create_cellular_devices_table {
    use super::{CellularDevices, PurchaseOrders, StorageLocations, TacCodes};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000005_create_cellular_devices_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CellularDevices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CellularDevices::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CellularDevices::Imei)
                                .string_len(15)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(CellularDevices::TacCodeId).uuid().null())
                        .col(ColumnDef::new(CellularDevices::Manufacturer).string().null())
                        .col(ColumnDef::new(CellularDevices::ModelName).string().null())
                        .col(ColumnDef::new(CellularDevices::Color).string().null())
                        .col(ColumnDef::new(CellularDevices::Storage).string().null())
                        .col(ColumnDef::new(CellularDevices::Grade).string().null())
                        .col(ColumnDef::new(CellularDevices::Status).string().not_null())
                        .col(
                            ColumnDef::new(CellularDevices::StorageLocationId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CellularDevices::PurchaseOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CellularDevices::QcRequired)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(CellularDevices::RepairRequired)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(CellularDevices::CreatedBy).string().not_null())
                        .col(ColumnDef::new(CellularDevices::UpdatedBy).string().not_null())
                        .col(
                            ColumnDef::new(CellularDevices::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CellularDevices::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cellular_devices_tac_code_id")
                                .from(CellularDevices::Table, CellularDevices::TacCodeId)
                                .to(TacCodes::Table, TacCodes::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cellular_devices_storage_location_id")
                                .from(CellularDevices::Table, CellularDevices::StorageLocationId)
                                .to(StorageLocations::Table, StorageLocations::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cellular_devices_purchase_order_id")
                                .from(CellularDevices::Table, CellularDevices::PurchaseOrderId)
                                .to(PurchaseOrders::Table, PurchaseOrders::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_cellular_devices_purchase_order_id")
                        .table(CellularDevices::Table)
                        .col(CellularDevices::PurchaseOrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CellularDevices::Table).to_owned())
                .await
        }
    }
}

mod m20240301_000006_create_serial_devices_table {
    use super::{PurchaseOrders, SerialDevices, StorageLocations};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000006_create_serial_devices_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SerialDevices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SerialDevices::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SerialDevices::SerialNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(SerialDevices::Manufacturer).string().null())
                        .col(ColumnDef::new(SerialDevices::ModelName).string().null())
                        .col(ColumnDef::new(SerialDevices::Color).string().null())
                        .col(ColumnDef::new(SerialDevices::Storage).string().null())
                        .col(ColumnDef::new(SerialDevices::Grade).string().null())
                        .col(ColumnDef::new(SerialDevices::Status).string().not_null())
                        .col(
                            ColumnDef::new(SerialDevices::StorageLocationId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SerialDevices::PurchaseOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SerialDevices::QcRequired)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(SerialDevices::RepairRequired)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(SerialDevices::CreatedBy).string().not_null())
                        .col(ColumnDef::new(SerialDevices::UpdatedBy).string().not_null())
                        .col(
                            ColumnDef::new(SerialDevices::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SerialDevices::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_serial_devices_storage_location_id")
                                .from(SerialDevices::Table, SerialDevices::StorageLocationId)
                                .to(StorageLocations::Table, StorageLocations::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_serial_devices_purchase_order_id")
                                .from(SerialDevices::Table, SerialDevices::PurchaseOrderId)
                                .to(PurchaseOrders::Table, PurchaseOrders::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_serial_devices_purchase_order_id")
                        .table(SerialDevices::Table)
                        .col(SerialDevices::PurchaseOrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SerialDevices::Table).to_owned())
                .await
        }
    }
}
