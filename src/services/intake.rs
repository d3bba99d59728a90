//! Scan-session workflow: open, scan, edit, remove, submit.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{
    catalog::CatalogService,
    devices::{already_received, DeviceService, Placement},
    purchase_orders::PurchaseOrderService,
    sessions::SessionStore,
    storage_locations::StorageLocationService,
};
use crate::{
    auth::AuthUser,
    config::IntakeSettings,
    db::{with_transaction, DbPool},
    errors::ServiceError,
    events::{DiscardReason, Event, EventSender},
    intake::{
        AlertCue, AlertDispatcher, DeviceEntry, DevicePatch, IdentifierKind, InitialAttributes,
        IntakeError, IntakeSession, IntakeSessionView,
    },
};

/// Result of a scan or edit: the updated session plus the affected device.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeviceOutcome {
    pub session: IntakeSessionView,
    pub index: usize,
    pub device: DeviceEntry,
    /// Set when the device carries a validation error.
    pub alert: Option<AlertCue>,
}

/// What a successful submission wrote.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmitReceipt {
    pub session_id: Uuid,
    pub purchase_order_id: Uuid,
    pub kind: IdentifierKind,
    pub devices_committed: usize,
    pub trays: Vec<String>,
    pub qc_required: bool,
    pub repair_required: bool,
}

#[derive(Clone)]
pub struct IntakeService {
    db: Arc<DbPool>,
    catalog: Arc<CatalogService>,
    storage_locations: Arc<StorageLocationService>,
    devices: Arc<DeviceService>,
    purchase_orders: Arc<PurchaseOrderService>,
    sessions: Arc<SessionStore>,
    event_sender: Arc<EventSender>,
    settings: IntakeSettings,
}

impl IntakeService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db: Arc<DbPool>,
        catalog: Arc<CatalogService>,
        storage_locations: Arc<StorageLocationService>,
        devices: Arc<DeviceService>,
        purchase_orders: Arc<PurchaseOrderService>,
        sessions: Arc<SessionStore>,
        event_sender: Arc<EventSender>,
        settings: IntakeSettings,
    ) -> Self {
        Self {
            db,
            catalog,
            storage_locations,
            devices,
            purchase_orders,
            sessions,
            event_sender,
            settings,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub async fn open_session(
        &self,
        user: &AuthUser,
        kind: IdentifierKind,
        purchase_order_id: Option<Uuid>,
    ) -> Result<IntakeSessionView, ServiceError> {
        if let Some(po) = purchase_order_id {
            self.purchase_orders.get(po).await?;
        }
        let allocator = self.storage_locations.next_tray_allocator().await?;

        let mut session = IntakeSession::new(kind, allocator, user.user_id.clone());
        session.select_purchase_order(purchase_order_id);
        let view = session.view();
        self.sessions.insert(session);

        counter!("intake.sessions.opened", 1);
        info!(session_id = %view.id, %kind, starting_tray = %view.starting_tray, "Intake session opened");
        self.event_sender
            .send_or_log(Event::IntakeSessionOpened {
                session_id: view.id,
                kind,
                opened_by: user.user_id.clone(),
            })
            .await;
        Ok(view)
    }

    pub fn get_session(
        &self,
        user: &AuthUser,
        session_id: Uuid,
    ) -> Result<IntakeSessionView, ServiceError> {
        Ok(self.sessions.view(session_id, &user.user_id)?)
    }

    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub async fn select_purchase_order(
        &self,
        user: &AuthUser,
        session_id: Uuid,
        purchase_order_id: Option<Uuid>,
    ) -> Result<IntakeSessionView, ServiceError> {
        // Ownership first so strangers learn nothing about purchase orders.
        self.sessions
            .with_session(session_id, &user.user_id, |_| ())?;
        if let Some(po) = purchase_order_id {
            self.purchase_orders.get(po).await?;
        }
        Ok(self
            .sessions
            .with_session(session_id, &user.user_id, |s| {
                s.select_purchase_order(purchase_order_id);
                s.view()
            })?)
    }

    /// Validates, classifies and appends one scanned identifier.
    ///
    /// Format and duplicate failures leave the session untouched.
    #[instrument(skip(self, user, attributes), fields(user_id = %user.user_id))]
    pub async fn scan(
        &self,
        user: &AuthUser,
        session_id: Uuid,
        raw_identifier: &str,
        attributes: InitialAttributes,
    ) -> Result<DeviceOutcome, ServiceError> {
        let result = self
            .scan_inner(user, session_id, raw_identifier, attributes)
            .await;
        match &result {
            Ok(outcome) => {
                counter!("intake.devices.scanned", 1);
                if outcome.alert.is_some() {
                    counter!("intake.devices.flagged", 1);
                }
            }
            Err(err) => {
                counter!("intake.devices.rejected", 1);
                if is_operator_rejection(err) {
                    AlertDispatcher::global().raise(session_id, AlertCue::Error, err.response_message());
                }
            }
        }
        result
    }

    async fn scan_inner(
        &self,
        user: &AuthUser,
        session_id: Uuid,
        raw_identifier: &str,
        attributes: InitialAttributes,
    ) -> Result<DeviceOutcome, ServiceError> {
        let kind = self
            .sessions
            .with_session(session_id, &user.user_id, |s| s.kind())?;
        let identifier = kind.normalize(raw_identifier)?;

        self.sessions
            .with_session(session_id, &user.user_id, |s| s.ensure_not_scanned(&identifier))??;

        if self.devices.exists(kind, &identifier).await? {
            return Err(IntakeError::AlreadyInInventory(kind).into());
        }

        let mut entry = DeviceEntry::new(identifier);
        if kind == IdentifierKind::Cellular {
            let classification = self.catalog.classify(&entry.identifier).await?;
            entry.tac_code = Some(classification.tac_code);
            entry.manufacturer = classification.manufacturer;
            entry.model = classification.model;
            entry.configuration = classification.configuration;
        }
        entry.apply(&DevicePatch::from(attributes));
        entry.revalidate();

        let (index, device, view) = self.sessions.with_session(session_id, &user.user_id, |s| {
            let index = s.push(entry)?;
            Ok::<_, IntakeError>((index, s.entry(index)?.clone(), s.view()))
        })??;

        Ok(self.outcome(session_id, view, index, device))
    }

    /// Edits one device and re-validates it. Changing manufacturer or model
    /// reloads the configuration it is validated against.
    #[instrument(skip(self, user, patch), fields(user_id = %user.user_id))]
    pub async fn edit_device(
        &self,
        user: &AuthUser,
        session_id: Uuid,
        index: usize,
        patch: DevicePatch,
    ) -> Result<DeviceOutcome, ServiceError> {
        patch.validate()?;

        let mut entry = self
            .sessions
            .with_session(session_id, &user.user_id, |s| s.entry(index).cloned())??;

        if entry.apply(&patch) {
            entry.configuration = self
                .catalog
                .configuration_for(entry.manufacturer.as_deref(), entry.model.as_deref())
                .await?;
        }
        entry.revalidate();

        let (device, view) = self.sessions.with_session(session_id, &user.user_id, |s| {
            s.replace(index, entry)?;
            Ok::<_, IntakeError>((s.entry(index)?.clone(), s.view()))
        })??;

        Ok(self.outcome(session_id, view, index, device))
    }

    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub fn remove_device(
        &self,
        user: &AuthUser,
        session_id: Uuid,
        index: usize,
    ) -> Result<IntakeSessionView, ServiceError> {
        Ok(self.sessions.with_session(session_id, &user.user_id, |s| {
            s.remove(index).map(|_| s.view())
        })??)
    }

    /// Commits every device in the session in one transaction.
    ///
    /// Preconditions are checked before any database access. The session
    /// stays in the store, locked against changes, until the commit lands;
    /// on failure or cancellation nothing is written and it is unlocked.
    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub async fn submit(
        &self,
        user: &AuthUser,
        session_id: Uuid,
    ) -> Result<SubmitReceipt, ServiceError> {
        let guard = self.sessions.begin_submit(session_id, &user.user_id)?;
        let purchase_order_id = guard.purchase_order_id();

        match self
            .commit(guard.session(), purchase_order_id, &user.user_id)
            .await
        {
            Ok(receipt) => {
                guard.complete();
                counter!("intake.devices.committed", receipt.devices_committed as u64);
                info!(
                    %session_id,
                    %purchase_order_id,
                    devices = receipt.devices_committed,
                    trays = ?receipt.trays,
                    "Intake session committed"
                );
                self.event_sender
                    .send_or_log(Event::DevicesReceived {
                        session_id,
                        purchase_order_id,
                        kind: receipt.kind,
                        devices: receipt.devices_committed,
                        trays: receipt.trays.clone(),
                        received_by: user.user_id.clone(),
                    })
                    .await;
                Ok(receipt)
            }
            Err(err) => {
                counter!("intake.commit.failures", 1);
                warn!(%session_id, error = %err, "Intake commit rolled back");
                Err(err)
            }
        }
    }

    async fn commit(
        &self,
        session: &IntakeSession,
        purchase_order_id: Uuid,
        received_by: &str,
    ) -> Result<SubmitReceipt, ServiceError> {
        let kind = session.kind();
        let entries: Vec<DeviceEntry> = session.entries().to_vec();
        let qc_required = session.qc_required();
        let repair_required = session.repair_required();
        let capacity = self.storage_locations.capacity();
        let received_by = received_by.to_string();

        let trays = with_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let order = PurchaseOrderService::find_in(txn, purchase_order_id).await?;
                PurchaseOrderService::set_requirements_in(
                    txn,
                    order,
                    qc_required,
                    repair_required,
                )
                .await?;

                let mut tray_ids: HashMap<String, Uuid> = HashMap::new();
                let mut trays = BTreeSet::new();
                for entry in &entries {
                    let tac_code_id = match (kind, entry.tac_code.as_deref()) {
                        (IdentifierKind::Cellular, Some(tac)) => {
                            CatalogService::resolve_tac_in(
                                txn,
                                tac,
                                entry.manufacturer.as_deref(),
                                entry.model.as_deref(),
                            )
                            .await?
                        }
                        _ => None,
                    };

                    let storage_location_id = match tray_ids.get(&entry.tray) {
                        Some(id) => *id,
                        None => {
                            let id =
                                StorageLocationService::resolve_tray_in(txn, &entry.tray, capacity)
                                    .await?;
                            tray_ids.insert(entry.tray.clone(), id);
                            id
                        }
                    };

                    if DeviceService::exists_in(txn, kind, &entry.identifier).await? {
                        return Err(already_received(kind, &entry.identifier));
                    }

                    DeviceService::insert_in(
                        txn,
                        kind,
                        entry,
                        Placement {
                            purchase_order_id,
                            storage_location_id,
                            tac_code_id,
                            received_by: &received_by,
                        },
                    )
                    .await?;
                    trays.insert(entry.tray.clone());
                }
                Ok::<_, ServiceError>(trays.into_iter().collect::<Vec<_>>())
            })
        })
        .await?;

        Ok(SubmitReceipt {
            session_id: session.id(),
            purchase_order_id,
            kind,
            devices_committed: session.len(),
            trays,
            qc_required,
            repair_required,
        })
    }

    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub async fn discard(&self, user: &AuthUser, session_id: Uuid) -> Result<(), ServiceError> {
        let session = self.sessions.take(session_id, &user.user_id)?;
        info!(%session_id, devices = session.len(), "Intake session discarded");
        self.event_sender
            .send_or_log(Event::IntakeSessionDiscarded {
                session_id,
                devices: session.len(),
                reason: DiscardReason::Operator,
            })
            .await;
        Ok(())
    }

    /// Drops sessions idle longer than the configured timeout.
    pub async fn sweep_idle_sessions(&self) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(self.settings.session_idle_timeout())
            .ok()
            .and_then(|timeout| Utc::now().checked_sub_signed(timeout))
        else {
            return 0;
        };
        let removed = self.sessions.remove_idle(cutoff);
        for session in &removed {
            warn!(session_id = %session.id(), devices = session.len(), "Discarding idle intake session");
            self.event_sender
                .send_or_log(Event::IntakeSessionDiscarded {
                    session_id: session.id(),
                    devices: session.len(),
                    reason: DiscardReason::IdleTimeout,
                })
                .await;
        }
        removed.len()
    }

    fn outcome(
        &self,
        session_id: Uuid,
        session: IntakeSessionView,
        index: usize,
        device: DeviceEntry,
    ) -> DeviceOutcome {
        let alert = device
            .validation_error
            .as_ref()
            .map(|error| AlertDispatcher::global().raise(session_id, AlertCue::Error, error.clone()));
        DeviceOutcome {
            session,
            index,
            device,
            alert,
        }
    }
}

/// Scan failures the operator should hear about. Missing sessions and
/// server-side failures are not the scanned device's fault.
fn is_operator_rejection(err: &ServiceError) -> bool {
    match err {
        ServiceError::Intake(IntakeError::SessionNotFound(_)) => false,
        ServiceError::Intake(_) | ServiceError::Conflict(_) => true,
        _ => false,
    }
}
