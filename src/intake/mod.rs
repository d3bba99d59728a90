//! Device intake domain.
//!
//! Pure, storage-free rules for a scan session: identifier formats, TAC
//! prefixes, tray packing, attribute validation against per-model
//! configuration and the submission preconditions. Services in
//! `crate::services::intake` wire these rules to the database.

pub mod alerts;
pub mod attributes;
pub mod entry;
pub mod identifier;
pub mod session;
pub mod tray;

use axum::http::StatusCode;
use thiserror::Error;

pub use alerts::{AlertCue, AlertDispatcher};
pub use attributes::{validate_attributes, DeviceConfiguration};
pub use entry::{DeviceEntry, DevicePatch, DeviceStatus, InitialAttributes};
pub use identifier::IdentifierKind;
pub use session::{IntakeSession, IntakeSessionView, TrayOccupancy};
pub use tray::TrayAllocator;

/// Errors raised by intake rules. The display text is what the operator sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("Please enter {}", .0.with_article())]
    EmptyIdentifier(IdentifierKind),

    #[error("IMEI must be exactly 15 digits")]
    InvalidImei,

    #[error("This {} has already been scanned", .0.label())]
    DuplicateInSession(IdentifierKind),

    #[error("{} already exists in inventory", .0.capitalized_label())]
    AlreadyInInventory(IdentifierKind),

    #[error("Please select a purchase order")]
    MissingPurchaseOrder,

    #[error("Please scan at least one device")]
    NoDevices,

    #[error("Please fix validation errors before submitting")]
    UnresolvedValidationErrors,

    #[error("This session is already being submitted")]
    SubmitInProgress,

    #[error("No tray numbers left for this session")]
    TrayNumbersExhausted,

    #[error("No device at position {0}")]
    EntryNotFound(usize),

    #[error("Intake session {0} not found")]
    SessionNotFound(uuid::Uuid),
}

impl IntakeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyIdentifier(_)
            | Self::InvalidImei
            | Self::MissingPurchaseOrder
            | Self::NoDevices
            | Self::UnresolvedValidationErrors => StatusCode::BAD_REQUEST,
            Self::DuplicateInSession(_) | Self::AlreadyInInventory(_) | Self::SubmitInProgress => {
                StatusCode::CONFLICT
            }
            Self::TrayNumbersExhausted => StatusCode::UNPROCESSABLE_ENTITY,
            Self::EntryNotFound(_) | Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_kind_specific() {
        assert_eq!(
            IntakeError::EmptyIdentifier(IdentifierKind::Cellular).to_string(),
            "Please enter an IMEI"
        );
        assert_eq!(
            IntakeError::EmptyIdentifier(IdentifierKind::Serial).to_string(),
            "Please enter a serial number"
        );
        assert_eq!(
            IntakeError::DuplicateInSession(IdentifierKind::Cellular).to_string(),
            "This IMEI has already been scanned"
        );
        assert_eq!(
            IntakeError::AlreadyInInventory(IdentifierKind::Serial).to_string(),
            "Serial number already exists in inventory"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(IntakeError::InvalidImei.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            IntakeError::AlreadyInInventory(IdentifierKind::Cellular).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(IntakeError::EntryNotFound(3).status_code(), StatusCode::NOT_FOUND);
    }
}
