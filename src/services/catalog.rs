use crate::{
    db::DbPool,
    entities::{
        device_configuration::{self, Entity as DeviceConfigurationEntity},
        tac_code::{self, Entity as TacCodeEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    intake::{
        identifier::{tac_prefix, TAC_LENGTH},
        DeviceConfiguration,
    },
};
use chrono::Utc;
use metrics::counter;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Result of looking a device up by its IMEI prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub tac_code: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub configuration: Option<DeviceConfiguration>,
}

/// Create-or-replace payload for a model's allowed attributes
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpsertDeviceConfiguration {
    #[validate(length(min = 1, max = 100))]
    pub manufacturer: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    pub colors: Vec<String>,
    pub storage_options: Vec<String>,
}

/// TAC lookup table and per-model attribute configuration
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl CatalogService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn find_tac(&self, tac: &str) -> Result<Option<tac_code::Model>, ServiceError> {
        Self::find_tac_in(&*self.db, tac).await
    }

    pub async fn get_tac(&self, tac: &str) -> Result<tac_code::Model, ServiceError> {
        if tac.len() != TAC_LENGTH || !tac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ServiceError::ValidationError(
                "TAC must be exactly 8 digits".to_string(),
            ));
        }
        self.find_tac(tac)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("TAC {} not found", tac)))
    }

    async fn find_tac_in<C: ConnectionTrait>(
        conn: &C,
        tac: &str,
    ) -> Result<Option<tac_code::Model>, ServiceError> {
        Ok(TacCodeEntity::find()
            .filter(tac_code::Column::TacCode.eq(tac))
            .one(conn)
            .await?)
    }

    /// Id of the TAC row for `tac`, inserting it from the given model when
    /// unseen. Returns `None` if it is unseen and the model is unknown.
    pub async fn resolve_tac_in<C: ConnectionTrait>(
        conn: &C,
        tac: &str,
        manufacturer: Option<&str>,
        model: Option<&str>,
    ) -> Result<Option<Uuid>, ServiceError> {
        if let Some(existing) = Self::find_tac_in(conn, tac).await? {
            return Ok(Some(existing.id));
        }
        let (Some(manufacturer), Some(model)) = (manufacturer, model) else {
            return Ok(None);
        };
        let created = tac_code::ActiveModel {
            id: Set(Uuid::new_v4()),
            tac_code: Set(tac.to_string()),
            manufacturer: Set(manufacturer.to_string()),
            model_name: Set(model.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(conn)
        .await?;
        counter!("intake.tac_codes.learned", 1);
        debug!(tac = %tac, %manufacturer, %model, "Recorded new TAC");
        Ok(Some(created.id))
    }

    /// Seeds or corrects a TAC mapping.
    #[instrument(skip(self))]
    pub async fn register_tac(
        &self,
        tac: &str,
        manufacturer: &str,
        model: &str,
    ) -> Result<tac_code::Model, ServiceError> {
        if tac.len() != TAC_LENGTH || !tac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ServiceError::ValidationError(
                "TAC must be exactly 8 digits".to_string(),
            ));
        }
        let now = Utc::now();
        match self.find_tac(tac).await? {
            Some(existing) => {
                let mut active: tac_code::ActiveModel = existing.into();
                active.manufacturer = Set(manufacturer.to_string());
                active.model_name = Set(model.to_string());
                Ok(active.update(&*self.db).await?)
            }
            None => Ok(tac_code::ActiveModel {
                id: Set(Uuid::new_v4()),
                tac_code: Set(tac.to_string()),
                manufacturer: Set(manufacturer.to_string()),
                model_name: Set(model.to_string()),
                created_at: Set(now),
            }
            .insert(&*self.db)
            .await?),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_configuration(
        &self,
        manufacturer: &str,
        model: &str,
    ) -> Result<Option<DeviceConfiguration>, ServiceError> {
        Ok(self
            .find_configuration_row(manufacturer.trim(), model.trim())
            .await?
            .map(|row| row.to_configuration()))
    }

    pub async fn get_configuration(
        &self,
        manufacturer: &str,
        model: &str,
    ) -> Result<DeviceConfiguration, ServiceError> {
        self.find_configuration(manufacturer, model)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "No configuration for {} {}",
                    manufacturer.trim(),
                    model.trim()
                ))
            })
    }

    async fn find_configuration_row(
        &self,
        manufacturer: &str,
        model: &str,
    ) -> Result<Option<device_configuration::Model>, ServiceError> {
        Ok(DeviceConfigurationEntity::find()
            .filter(device_configuration::Column::Manufacturer.eq(manufacturer))
            .filter(device_configuration::Column::ModelName.eq(model))
            .one(&*self.db)
            .await?)
    }

    /// Configuration for an entry's manufacturer/model, when both are known.
    pub async fn configuration_for(
        &self,
        manufacturer: Option<&str>,
        model: Option<&str>,
    ) -> Result<Option<DeviceConfiguration>, ServiceError> {
        match (manufacturer, model) {
            (Some(manufacturer), Some(model)) => self.find_configuration(manufacturer, model).await,
            _ => Ok(None),
        }
    }

    /// Looks the IMEI's TAC up and loads the matching configuration.
    #[instrument(skip(self))]
    pub async fn classify(&self, imei: &str) -> Result<Classification, ServiceError> {
        let tac = tac_prefix(imei)
            .ok_or_else(|| ServiceError::ValidationError("IMEI must be exactly 15 digits".into()))?
            .to_string();

        let Some(row) = self.find_tac(&tac).await? else {
            counter!("intake.tac_codes.unknown", 1);
            debug!(%tac, "TAC not in lookup table");
            return Ok(Classification {
                tac_code: tac,
                manufacturer: None,
                model: None,
                configuration: None,
            });
        };

        let configuration = self
            .find_configuration(&row.manufacturer, &row.model_name)
            .await?;
        Ok(Classification {
            tac_code: tac,
            manufacturer: Some(row.manufacturer),
            model: Some(row.model_name),
            configuration,
        })
    }

    #[instrument(skip(self, input), fields(manufacturer = %input.manufacturer, model = %input.model))]
    pub async fn upsert_configuration(
        &self,
        input: UpsertDeviceConfiguration,
    ) -> Result<DeviceConfiguration, ServiceError> {
        input.validate()?;
        let manufacturer = input.manufacturer.trim().to_string();
        let model = input.model.trim().to_string();
        let colors = clean_list(input.colors);
        let storage_options = clean_list(input.storage_options);
        let now = Utc::now();

        let saved = match self.find_configuration_row(&manufacturer, &model).await? {
            Some(existing) => {
                let mut active: device_configuration::ActiveModel = existing.into();
                active.colors = Set(serde_json::to_value(&colors)?);
                active.storage_options = Set(serde_json::to_value(&storage_options)?);
                active.updated_at = Set(now);
                active.update(&*self.db).await?
            }
            None => {
                device_configuration::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    manufacturer: Set(manufacturer.clone()),
                    model_name: Set(model.clone()),
                    colors: Set(serde_json::to_value(&colors)?),
                    storage_options: Set(serde_json::to_value(&storage_options)?),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&*self.db)
                .await?
            }
        };

        info!("Device configuration saved");
        self.event_sender
            .send_or_log(Event::DeviceConfigurationChanged {
                manufacturer,
                model,
            })
            .await;
        Ok(saved.to_configuration())
    }
}

/// Trims entries and drops blanks and case-insensitive repeats.
fn clean_list(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !out.iter().any(|v| v.eq_ignore_ascii_case(value)) {
            out.push(value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_list_trims_and_dedupes() {
        assert_eq!(
            clean_list(vec![
                " Midnight ".into(),
                "".into(),
                "midnight".into(),
                "Starlight".into()
            ]),
            vec!["Midnight", "Starlight"]
        );
    }
}
