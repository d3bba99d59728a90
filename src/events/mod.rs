use metrics::counter;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::intake::IdentifierKind;

/// Sends domain events to the background processor.
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the processor is gone.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!(error = %e, "Event dropped");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    IntakeSessionOpened {
        session_id: Uuid,
        kind: IdentifierKind,
        opened_by: String,
    },
    IntakeSessionDiscarded {
        session_id: Uuid,
        devices: usize,
        reason: DiscardReason,
    },
    DevicesReceived {
        session_id: Uuid,
        purchase_order_id: Uuid,
        kind: IdentifierKind,
        devices: usize,
        trays: Vec<String>,
        received_by: String,
    },
    DeviceConfigurationChanged {
        manufacturer: String,
        model: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscardReason {
    Operator,
    IdleTimeout,
}

/// Drains the event channel until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::IntakeSessionOpened {
                session_id,
                kind,
                opened_by,
            } => {
                info!(%session_id, %kind, %opened_by, "Intake session opened");
            }
            Event::IntakeSessionDiscarded {
                session_id,
                devices,
                reason,
            } => {
                info!(%session_id, devices, ?reason, "Intake session discarded");
            }
            Event::DevicesReceived {
                session_id,
                purchase_order_id,
                kind,
                devices,
                trays,
                received_by,
            } => {
                counter!("intake.events.devices_received", 1);
                info!(
                    %session_id,
                    %purchase_order_id,
                    %kind,
                    devices,
                    trays = ?trays,
                    %received_by,
                    "Devices received into inventory"
                );
            }
            Event::DeviceConfigurationChanged {
                manufacturer,
                model,
            } => {
                info!(%manufacturer, %model, "Device configuration changed");
            }
        }
    }

    info!("Event processing loop stopped");
}
