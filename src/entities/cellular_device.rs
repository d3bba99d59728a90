use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A received device identified by IMEI.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cellular_devices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub imei: String,
    pub tac_code_id: Option<Uuid>,
    pub manufacturer: Option<String>,
    pub model_name: Option<String>,
    pub color: Option<String>,
    pub storage: Option<String>,
    pub grade: Option<String>,
    pub status: String,
    pub storage_location_id: Uuid,
    pub purchase_order_id: Uuid,
    pub qc_required: bool,
    pub repair_required: bool,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tac_code::Entity",
        from = "Column::TacCodeId",
        to = "super::tac_code::Column::Id"
    )]
    TacCode,
    #[sea_orm(
        belongs_to = "super::storage_location::Entity",
        from = "Column::StorageLocationId",
        to = "super::storage_location::Column::Id"
    )]
    StorageLocation,
    #[sea_orm(
        belongs_to = "super::purchase_order::Entity",
        from = "Column::PurchaseOrderId",
        to = "super::purchase_order::Column::Id"
    )]
    PurchaseOrder,
}

impl Related<super::tac_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TacCode.def()
    }
}

impl Related<super::storage_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StorageLocation.def()
    }
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
