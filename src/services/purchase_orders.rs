use crate::{
    db::DbPool,
    entities::purchase_order::{self, Entity as PurchaseOrderEntity, STATUS_PENDING},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Input for registering a purchase order to receive against
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePurchaseOrder {
    #[validate(length(min = 1, max = 64))]
    pub order_number: String,
    #[validate(length(max = 255))]
    pub supplier_name: Option<String>,
}

/// Purchase order reads and the receiving-requirement update
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: Arc<DbPool>,
}

impl PurchaseOrderService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Orders still awaiting receipt, oldest first.
    #[instrument(skip(self))]
    pub async fn list_pending(&self) -> Result<Vec<purchase_order::Model>, ServiceError> {
        let orders = PurchaseOrderEntity::find()
            .filter(purchase_order::Column::Status.eq(STATUS_PENDING))
            .order_by_asc(purchase_order::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<purchase_order::Model, ServiceError> {
        Self::find_in(&*self.db, id).await
    }

    pub async fn find_by_number(
        &self,
        order_number: &str,
    ) -> Result<Option<purchase_order::Model>, ServiceError> {
        Ok(PurchaseOrderEntity::find()
            .filter(purchase_order::Column::OrderNumber.eq(order_number.trim()))
            .one(&*self.db)
            .await?)
    }

    pub async fn find_in<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
    ) -> Result<purchase_order::Model, ServiceError> {
        PurchaseOrderEntity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", id)))
    }

    /// Overwrites the order's QC and repair flags.
    pub async fn set_requirements_in<C: ConnectionTrait>(
        conn: &C,
        order: purchase_order::Model,
        qc_required: bool,
        repair_required: bool,
    ) -> Result<purchase_order::Model, ServiceError> {
        let mut active: purchase_order::ActiveModel = order.into();
        active.qc_required = Set(qc_required);
        active.repair_required = Set(repair_required);
        active.updated_at = Set(Utc::now());
        Ok(active.update(conn).await?)
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        input: CreatePurchaseOrder,
    ) -> Result<purchase_order::Model, ServiceError> {
        input.validate()?;
        let now = Utc::now();
        let order = purchase_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_number: Set(input.order_number.trim().to_string()),
            supplier_name: Set(input.supplier_name),
            status: Set(STATUS_PENDING.to_string()),
            qc_required: Set(false),
            repair_required: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;
        info!(purchase_order_id = %order.id, order_number = %order.order_number, "Purchase order created");
        Ok(order)
    }
}
