use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const LOCATION_TYPE_TRAY: &str = "tray";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "storage_locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub location_code: String,
    pub location_type: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
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
