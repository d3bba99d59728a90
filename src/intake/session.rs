use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    entry::DeviceEntry, identifier::IdentifierKind, tray::TrayAllocator, IntakeError,
};

/// Working set of one operator's scan session.
#[derive(Debug, Clone)]
pub struct IntakeSession {
    id: Uuid,
    kind: IdentifierKind,
    purchase_order_id: Option<Uuid>,
    opened_by: String,
    opened_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    allocator: TrayAllocator,
    entries: Vec<DeviceEntry>,
    submitting: bool,
}

impl IntakeSession {
    pub fn new(kind: IdentifierKind, allocator: TrayAllocator, opened_by: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            purchase_order_id: None,
            opened_by: opened_by.into(),
            opened_at: now,
            last_activity: now,
            allocator,
            entries: Vec::new(),
            submitting: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    pub fn opened_by(&self) -> &str {
        &self.opened_by
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn purchase_order_id(&self) -> Option<Uuid> {
        self.purchase_order_id
    }

    pub fn allocator(&self) -> &TrayAllocator {
        &self.allocator
    }

    pub fn entries(&self) -> &[DeviceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set while a commit of this session is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    pub fn select_purchase_order(&mut self, purchase_order_id: Option<Uuid>) {
        self.purchase_order_id = purchase_order_id;
        self.touch();
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.iter().any(|e| e.identifier == identifier)
    }

    pub fn ensure_not_scanned(&self, identifier: &str) -> Result<(), IntakeError> {
        if self.contains(identifier) {
            Err(IntakeError::DuplicateInSession(self.kind))
        } else {
            Ok(())
        }
    }

    /// Appends a device and packs it into its tray. Returns its position.
    pub fn push(&mut self, entry: DeviceEntry) -> Result<usize, IntakeError> {
        self.ensure_not_scanned(&entry.identifier)?;
        if self.allocator.tray_number(self.entries.len()).is_none() {
            return Err(IntakeError::TrayNumbersExhausted);
        }
        self.entries.push(entry);
        self.reallocate();
        self.touch();
        Ok(self.entries.len() - 1)
    }

    /// Removes a device; everything after it moves up and trays are recomputed.
    pub fn remove(&mut self, index: usize) -> Result<DeviceEntry, IntakeError> {
        if index >= self.entries.len() {
            return Err(IntakeError::EntryNotFound(index));
        }
        let removed = self.entries.remove(index);
        self.reallocate();
        self.touch();
        Ok(removed)
    }

    pub fn entry(&self, index: usize) -> Result<&DeviceEntry, IntakeError> {
        self.entries.get(index).ok_or(IntakeError::EntryNotFound(index))
    }

    /// Replaces the device at `index`, provided it is still the same identifier.
    pub fn replace(&mut self, index: usize, entry: DeviceEntry) -> Result<(), IntakeError> {
        let slot = self
            .entries
            .get_mut(index)
            .filter(|current| current.identifier == entry.identifier)
            .ok_or(IntakeError::EntryNotFound(index))?;
        let tray = std::mem::take(&mut slot.tray);
        *slot = DeviceEntry { tray, ..entry };
        self.touch();
        Ok(())
    }

    // `push` refuses positions without a tray number, so every index here has one.
    fn reallocate(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if let Some(code) = self.allocator.tray_code(index) {
                entry.tray = code;
            }
        }
    }

    pub fn has_validation_errors(&self) -> bool {
        self.entries.iter().any(DeviceEntry::has_error)
    }

    /// Submission preconditions, checked before any store access.
    pub fn check_submittable(&self) -> Result<Uuid, IntakeError> {
        let purchase_order_id = self
            .purchase_order_id
            .ok_or(IntakeError::MissingPurchaseOrder)?;
        if self.entries.is_empty() {
            return Err(IntakeError::NoDevices);
        }
        if self.has_validation_errors() {
            return Err(IntakeError::UnresolvedValidationErrors);
        }
        Ok(purchase_order_id)
    }

    pub fn qc_required(&self) -> bool {
        self.entries.iter().any(|e| e.qc_required)
    }

    pub fn repair_required(&self) -> bool {
        self.entries.iter().any(|e| e.repair_required)
    }

    /// Device counts per tray, in tray order.
    pub fn tray_occupancy(&self) -> Vec<TrayOccupancy> {
        let mut trays: Vec<TrayOccupancy> = Vec::new();
        for entry in &self.entries {
            match trays.last_mut() {
                Some(last) if last.tray == entry.tray => last.devices += 1,
                _ => trays.push(TrayOccupancy {
                    tray: entry.tray.clone(),
                    devices: 1,
                    capacity: self.allocator.capacity(),
                }),
            }
        }
        trays
    }

    pub fn view(&self) -> IntakeSessionView {
        IntakeSessionView {
            id: self.id,
            kind: self.kind,
            purchase_order_id: self.purchase_order_id,
            opened_by: self.opened_by.clone(),
            opened_at: self.opened_at,
            starting_tray: self.allocator.start_code(),
            devices: self.entries.clone(),
            trays: self.tray_occupancy(),
            can_submit: self.check_submittable().is_ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TrayOccupancy {
    pub tray: String,
    pub devices: usize,
    pub capacity: usize,
}

/// Snapshot of a session as returned to the operator's screen.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IntakeSessionView {
    pub id: Uuid,
    pub kind: IdentifierKind,
    pub purchase_order_id: Option<Uuid>,
    pub opened_by: String,
    pub opened_at: DateTime<Utc>,
    pub starting_tray: String,
    pub devices: Vec<DeviceEntry>,
    pub trays: Vec<TrayOccupancy>,
    pub can_submit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::entry::DevicePatch;
    use assert_matches::assert_matches;

    fn session(start: u32) -> IntakeSession {
        IntakeSession::new(
            IdentifierKind::Cellular,
            TrayAllocator::new("TRAY", 50, start),
            "user-1",
        )
    }

    fn imei(n: usize) -> String {
        format!("35693803{:07}", n)
    }

    #[test]
    fn fifty_one_devices_span_two_trays() {
        let mut s = session(10);
        for n in 0..51 {
            s.push(DeviceEntry::new(imei(n))).unwrap();
        }
        assert!(s.entries()[..50].iter().all(|e| e.tray == "TRAY010"));
        assert_eq!(s.entries()[50].tray, "TRAY011");
        assert_eq!(
            s.tray_occupancy(),
            vec![
                TrayOccupancy { tray: "TRAY010".into(), devices: 50, capacity: 50 },
                TrayOccupancy { tray: "TRAY011".into(), devices: 1, capacity: 50 },
            ]
        );
    }

    #[test]
    fn removing_first_device_renumbers_remaining() {
        let mut s = session(3);
        for n in 0..3 {
            s.push(DeviceEntry::new(imei(n))).unwrap();
        }
        let removed = s.remove(0).unwrap();
        assert_eq!(removed.identifier, imei(0));
        assert_eq!(s.len(), 2);
        assert_eq!(s.entries()[0].identifier, imei(1));
        assert_eq!(s.entries()[1].identifier, imei(2));
        assert!(s.entries().iter().all(|e| e.tray == "TRAY003"));
    }

    #[test]
    fn removal_pulls_devices_back_into_earlier_tray() {
        let mut s = session(1);
        for n in 0..51 {
            s.push(DeviceEntry::new(imei(n))).unwrap();
        }
        s.remove(10).unwrap();
        assert!(s.entries().iter().all(|e| e.tray == "TRAY001"));
        assert_eq!(s.tray_occupancy().len(), 1);
    }

    #[test]
    fn push_past_last_tray_number_is_refused() {
        let mut s = IntakeSession::new(
            IdentifierKind::Serial,
            TrayAllocator::new("TRAY", 1, u32::MAX),
            "user-1",
        );
        s.push(DeviceEntry::new("SN1")).unwrap();
        assert_eq!(s.entries()[0].tray, "TRAY4294967295");
        assert_eq!(
            s.push(DeviceEntry::new("SN2")),
            Err(IntakeError::TrayNumbersExhausted)
        );
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn duplicate_is_rejected() {
        let mut s = session(1);
        s.push(DeviceEntry::new(imei(1))).unwrap();
        assert_eq!(
            s.push(DeviceEntry::new(imei(1))),
            Err(IntakeError::DuplicateInSession(IdentifierKind::Cellular))
        );
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn out_of_range_removal() {
        let mut s = session(1);
        assert_matches!(s.remove(0), Err(IntakeError::EntryNotFound(0)));
    }

    #[test]
    fn submission_preconditions_in_order() {
        let mut s = session(1);
        assert_eq!(s.check_submittable(), Err(IntakeError::MissingPurchaseOrder));

        let po = Uuid::new_v4();
        s.select_purchase_order(Some(po));
        assert_eq!(s.check_submittable(), Err(IntakeError::NoDevices));

        let mut bad = DeviceEntry::new(imei(1));
        bad.validation_error = Some("Invalid color \"Pink\". Allowed: Black".into());
        s.push(bad).unwrap();
        assert_eq!(
            s.check_submittable(),
            Err(IntakeError::UnresolvedValidationErrors)
        );
        assert!(!s.view().can_submit);

        let mut fixed = s.entry(0).unwrap().clone();
        fixed.apply(&DevicePatch::default());
        fixed.revalidate();
        s.replace(0, fixed).unwrap();
        assert_eq!(s.check_submittable(), Ok(po));
    }

    #[test]
    fn replace_keeps_tray_and_requires_same_identifier() {
        let mut s = session(5);
        s.push(DeviceEntry::new(imei(1))).unwrap();
        let mut edited = s.entry(0).unwrap().clone();
        edited.color = Some("Black".into());
        edited.tray = String::new();
        s.replace(0, edited).unwrap();
        assert_eq!(s.entries()[0].tray, "TRAY005");
        assert_eq!(s.entries()[0].color.as_deref(), Some("Black"));

        assert_eq!(
            s.replace(0, DeviceEntry::new(imei(2))),
            Err(IntakeError::EntryNotFound(0))
        );
    }

    #[test]
    fn requirement_flags_are_or_over_devices() {
        let mut s = session(1);
        let mut a = DeviceEntry::new(imei(1));
        a.repair_required = true;
        s.push(a).unwrap();
        s.push(DeviceEntry::new(imei(2))).unwrap();
        assert!(s.repair_required());
        assert!(!s.qc_required());
    }
}
