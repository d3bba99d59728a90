use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

use super::attributes::{validate_attributes, DeviceConfiguration};

/// Stock status a device is received into.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceStatus {
    QcRequired,
    Repair,
    InStock,
}

impl DeviceStatus {
    /// First matching flag wins: QC, then repair, then in stock.
    pub fn from_flags(qc_required: bool, repair_required: bool) -> Self {
        if qc_required {
            Self::QcRequired
        } else if repair_required {
            Self::Repair
        } else {
            Self::InStock
        }
    }
}

/// One scanned device in a session's working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeviceEntry {
    pub identifier: String,
    pub tac_code: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub storage: Option<String>,
    pub grade: Option<String>,
    pub status: DeviceStatus,
    pub tray: String,
    pub qc_required: bool,
    pub repair_required: bool,
    pub validation_error: Option<String>,
    #[serde(skip)]
    pub configuration: Option<DeviceConfiguration>,
}

impl DeviceEntry {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            tac_code: None,
            manufacturer: None,
            model: None,
            color: None,
            storage: None,
            grade: None,
            status: DeviceStatus::InStock,
            tray: String::new(),
            qc_required: false,
            repair_required: false,
            validation_error: None,
            configuration: None,
        }
    }

    pub fn is_classified(&self) -> bool {
        self.manufacturer.is_some() && self.model.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.validation_error
            .as_deref()
            .map_or(false, |e| !e.is_empty())
    }

    /// Recomputes status and the validation error from the current fields.
    pub fn revalidate(&mut self) {
        self.status = DeviceStatus::from_flags(self.qc_required, self.repair_required);
        self.validation_error = validate_attributes(
            self.color.as_deref(),
            self.storage.as_deref(),
            self.configuration.as_ref(),
        );
    }

    /// Applies an edit. Returns true when manufacturer or model changed, in
    /// which case the caller must reload the configuration before revalidating.
    pub fn apply(&mut self, patch: &DevicePatch) -> bool {
        let mut identity_changed = false;
        if let Some(manufacturer) = &patch.manufacturer {
            let value = non_empty(manufacturer);
            identity_changed |= value != self.manufacturer;
            self.manufacturer = value;
        }
        if let Some(model) = &patch.model {
            let value = non_empty(model);
            identity_changed |= value != self.model;
            self.model = value;
        }
        if let Some(color) = &patch.color {
            self.color = non_empty(color);
        }
        if let Some(storage) = &patch.storage {
            self.storage = non_empty(storage);
        }
        if let Some(grade) = &patch.grade {
            self.grade = non_empty(grade);
        }
        if let Some(qc) = patch.qc_required {
            self.qc_required = qc;
        }
        if let Some(repair) = patch.repair_required {
            self.repair_required = repair;
        }
        identity_changed
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Field edits for a scanned device. Absent fields are left alone, empty
/// strings clear the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct DevicePatch {
    #[validate(length(max = 100))]
    pub manufacturer: Option<String>,
    #[validate(length(max = 100))]
    pub model: Option<String>,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[validate(length(max = 50))]
    pub storage: Option<String>,
    #[validate(length(max = 20))]
    pub grade: Option<String>,
    pub qc_required: Option<bool>,
    pub repair_required: Option<bool>,
}

/// Attributes the operator may set at scan time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InitialAttributes {
    pub color: Option<String>,
    pub storage: Option<String>,
    pub grade: Option<String>,
    #[serde(default)]
    pub qc_required: bool,
    #[serde(default)]
    pub repair_required: bool,
}

impl From<InitialAttributes> for DevicePatch {
    fn from(attrs: InitialAttributes) -> Self {
        Self {
            manufacturer: None,
            model: None,
            color: attrs.color,
            storage: attrs.storage,
            grade: attrs.grade,
            qc_required: Some(attrs.qc_required),
            repair_required: Some(attrs.repair_required),
        }
    }
}
