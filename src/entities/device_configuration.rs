use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::intake::DeviceConfiguration;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "device_configurations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub manufacturer: String,
    pub model_name: String,
    /// JSON array of allowed color names
    pub colors: Json,
    /// JSON array of allowed storage options
    pub storage_options: Json,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the stored row into the validator's view of it. Non-string
    /// array members are ignored.
    pub fn to_configuration(&self) -> DeviceConfiguration {
        DeviceConfiguration {
            manufacturer: self.manufacturer.clone(),
            model: self.model_name.clone(),
            colors: string_list(&self.colors),
            storage_options: string_list(&self.storage_options),
        }
    }
}

fn string_list(value: &Json) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_arrays_become_string_lists() {
        let now = chrono::Utc::now();
        let model = Model {
            id: Uuid::new_v4(),
            manufacturer: "Apple".into(),
            model_name: "iPhone 13".into(),
            colors: json!(["Midnight", 7, "Starlight"]),
            storage_options: json!(null),
            created_at: now,
            updated_at: now,
        };
        let config = model.to_configuration();
        assert_eq!(config.colors, vec!["Midnight", "Starlight"]);
        assert!(config.storage_options.is_empty());
        assert_eq!(config.model, "iPhone 13");
    }
}
