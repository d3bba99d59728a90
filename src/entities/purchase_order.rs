use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const STATUS_PENDING: &str = "pending";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_number: String,
    pub supplier_name: Option<String>,
    pub status: String,
    pub qc_required: bool,
    pub repair_required: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cellular_device::Entity")]
    CellularDevices,
    #[sea_orm(has_many = "super::serial_device::Entity")]
    SerialDevices,
}

impl Related<super::cellular_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CellularDevices.def()
    }
}

impl Related<super::serial_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SerialDevices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
