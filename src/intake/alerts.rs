//! Operator alert cues.
//!
//! Scan and edit failures raise an audible cue on the operator's station.
//! The server reports the cue on the response and fans it out through a
//! single process-wide dispatcher created on first use.

use metrics::counter;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

const ALERT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertCue {
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertEvent {
    pub session_id: Uuid,
    pub cue: AlertCue,
    pub message: String,
}

pub struct AlertDispatcher {
    sender: broadcast::Sender<AlertEvent>,
}

static DISPATCHER: Lazy<AlertDispatcher> = Lazy::new(|| {
    let (sender, _) = broadcast::channel(ALERT_CHANNEL_CAPACITY);
    AlertDispatcher { sender }
});

impl AlertDispatcher {
    pub fn global() -> &'static AlertDispatcher {
        &DISPATCHER
    }

    /// Raises a cue and returns it so callers can attach it to their response.
    pub fn raise(&self, session_id: Uuid, cue: AlertCue, message: impl Into<String>) -> AlertCue {
        let message = message.into();
        counter!("intake.alerts.raised", 1);
        warn!(session_id = %session_id, cue = ?cue, message = %message, "Intake alert");
        // No subscribers is the normal case for API-only deployments.
        let _ = self.sender.send(AlertEvent {
            session_id,
            cue,
            message,
        });
        cue
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AlertEvent> {
        self.sender.subscribe()
    }
}
