use crate::{
    db::DbPool,
    entities::storage_location::{self, Entity as StorageLocationEntity, LOCATION_TYPE_TRAY},
    errors::ServiceError,
    intake::{tray::parse_tray_number, TrayAllocator},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Tray numbering and tray location records
#[derive(Clone)]
pub struct StorageLocationService {
    db: Arc<DbPool>,
    prefix: String,
    capacity: usize,
}

impl StorageLocationService {
    pub fn new(db: Arc<DbPool>, prefix: impl Into<String>, capacity: usize) -> Self {
        Self {
            db,
            prefix: prefix.into(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Highest tray number already recorded, if any.
    ///
    /// Codes are compared numerically so TRAY1000 sorts after TRAY999.
    #[instrument(skip(self))]
    pub async fn max_tray_number(&self) -> Result<Option<u32>, ServiceError> {
        let codes: Vec<String> = StorageLocationEntity::find()
            .select_only()
            .column(storage_location::Column::LocationCode)
            .filter(storage_location::Column::LocationCode.starts_with(self.prefix.as_str()))
            .into_tuple()
            .all(&*self.db)
            .await?;

        Ok(codes
            .iter()
            .filter_map(|code| parse_tray_number(&self.prefix, code))
            .max())
    }

    /// Allocator whose first tray follows the highest recorded one.
    pub async fn next_tray_allocator(&self) -> Result<TrayAllocator, ServiceError> {
        let max = self.max_tray_number().await?;
        TrayAllocator::starting_after(self.prefix.clone(), self.capacity, max).ok_or_else(|| {
            ServiceError::InvalidOperation(format!(
                "Tray numbering for prefix {} is exhausted",
                self.prefix
            ))
        })
    }

    /// Id of the location with `code`, creating it as a tray if missing.
    pub async fn resolve_tray_in<C: ConnectionTrait>(
        conn: &C,
        code: &str,
        capacity: usize,
    ) -> Result<Uuid, ServiceError> {
        if let Some(existing) = StorageLocationEntity::find()
            .filter(storage_location::Column::LocationCode.eq(code))
            .one(conn)
            .await?
        {
            return Ok(existing.id);
        }

        let capacity = i32::try_from(capacity).map_err(|_| {
            ServiceError::InvalidOperation(format!("Tray capacity {} is out of range", capacity))
        })?;
        let created = storage_location::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_code: Set(code.to_string()),
            location_type: Set(LOCATION_TYPE_TRAY.to_string()),
            capacity: Set(capacity),
            created_at: Set(Utc::now()),
        }
        .insert(conn)
        .await?;
        debug!(location_code = %code, "Created tray location");
        Ok(created.id)
    }
}
