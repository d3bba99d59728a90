use crate::{
    db::DbPool,
    entities::{cellular_device, serial_device},
    errors::ServiceError,
    intake::{DeviceEntry, IdentifierKind},
};
use chrono::Utc;
use sea_orm::{
    error::SqlErr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Everything a device row needs beyond the scanned entry itself.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub purchase_order_id: Uuid,
    pub storage_location_id: Uuid,
    pub tac_code_id: Option<Uuid>,
    pub received_by: &'a str,
}

/// Device tables, one per identifier kind
#[derive(Clone)]
pub struct DeviceService {
    db: Arc<DbPool>,
}

impl DeviceService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn exists(&self, kind: IdentifierKind, identifier: &str) -> Result<bool, ServiceError> {
        Self::exists_in(&*self.db, kind, identifier).await
    }

    pub async fn exists_in<C: ConnectionTrait>(
        conn: &C,
        kind: IdentifierKind,
        identifier: &str,
    ) -> Result<bool, ServiceError> {
        let count = match kind {
            IdentifierKind::Cellular => {
                cellular_device::Entity::find()
                    .filter(cellular_device::Column::Imei.eq(identifier))
                    .count(conn)
                    .await?
            }
            IdentifierKind::Serial => {
                serial_device::Entity::find()
                    .filter(serial_device::Column::SerialNumber.eq(identifier))
                    .count(conn)
                    .await?
            }
        };
        Ok(count > 0)
    }

    /// Inserts the entry into its kind's table. A unique-index hit surfaces
    /// as a conflict naming the identifier.
    pub async fn insert_in<C: ConnectionTrait>(
        conn: &C,
        kind: IdentifierKind,
        entry: &DeviceEntry,
        placement: Placement<'_>,
    ) -> Result<Uuid, ServiceError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let status = entry.status.to_string();

        let result = match kind {
            IdentifierKind::Cellular => cellular_device::ActiveModel {
                id: Set(id),
                imei: Set(entry.identifier.clone()),
                tac_code_id: Set(placement.tac_code_id),
                manufacturer: Set(entry.manufacturer.clone()),
                model_name: Set(entry.model.clone()),
                color: Set(entry.color.clone()),
                storage: Set(entry.storage.clone()),
                grade: Set(entry.grade.clone()),
                status: Set(status),
                storage_location_id: Set(placement.storage_location_id),
                purchase_order_id: Set(placement.purchase_order_id),
                qc_required: Set(entry.qc_required),
                repair_required: Set(entry.repair_required),
                created_by: Set(placement.received_by.to_string()),
                updated_by: Set(placement.received_by.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(conn)
            .await
            .map(|_| ()),
            IdentifierKind::Serial => serial_device::ActiveModel {
                id: Set(id),
                serial_number: Set(entry.identifier.clone()),
                manufacturer: Set(entry.manufacturer.clone()),
                model_name: Set(entry.model.clone()),
                color: Set(entry.color.clone()),
                storage: Set(entry.storage.clone()),
                grade: Set(entry.grade.clone()),
                status: Set(status),
                storage_location_id: Set(placement.storage_location_id),
                purchase_order_id: Set(placement.purchase_order_id),
                qc_required: Set(entry.qc_required),
                repair_required: Set(entry.repair_required),
                created_by: Set(placement.received_by.to_string()),
                updated_by: Set(placement.received_by.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(conn)
            .await
            .map(|_| ()),
        };

        result.map_err(|err| duplicate_or_db(err, kind, &entry.identifier))?;
        Ok(id)
    }
}

pub(crate) fn already_received(kind: IdentifierKind, identifier: &str) -> ServiceError {
    ServiceError::Conflict(format!(
        "{} {} already exists in inventory",
        kind.capitalized_label(),
        identifier
    ))
}

fn duplicate_or_db(err: DbErr, kind: IdentifierKind, identifier: &str) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => already_received(kind, identifier),
        _ => ServiceError::DatabaseError(err),
    }
}
