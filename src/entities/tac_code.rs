use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Maps the 8-digit Type Allocation Code prefix of an IMEI to a model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tac_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub tac_code: String,
    pub manufacturer: String,
    pub model_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cellular_device::Entity")]
    CellularDevices,
}

impl Related<super::cellular_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CellularDevices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
