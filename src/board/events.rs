use serde::{Deserialize, Serialize};

use super::models::{Card, Column, DetailedStatus};

// ── Inbound gestures ─────────────────────────────────────────────────

/// One event dispatched into the board by the host UI.
///
/// Serialised as `{"type": "drag_start", "card_id": "p-1"}` and so on, which
/// is also the line format of a replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardInput {
    DragStart {
        card_id: String,
    },
    DragOver {
        over_id: String,
    },
    DragEnd {
        #[serde(default)]
        over_id: Option<String>,
    },
    Refresh {
        cards: Vec<Card>,
    },
    ViewCard {
        card_id: String,
    },
}

// ── Outbound notifications ───────────────────────────────────────────

/// A committed cross-column move, with the canonical values to persist and
/// the values it replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub card_id: String,
    /// Board-wide commit number; later commits carry larger values.
    #[serde(default)]
    pub seq: u64,
    pub status: DetailedStatus,
    pub progress: u8,
    pub previous_column: Column,
    pub previous_status: DetailedStatus,
    pub previous_progress: u8,
}

/// Report that persisting a `StatusChange` failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistFailure {
    pub card_id: String,
    /// `seq` of the change that failed.
    #[serde(default)]
    pub seq: u64,
    pub previous_column: Column,
    pub previous_status: DetailedStatus,
    pub previous_progress: u8,
    /// Status the failed request tried to store.
    pub attempted_status: DetailedStatus,
    pub error: String,
}

impl PersistFailure {
    pub fn from_change(change: &StatusChange, error: impl Into<String>) -> Self {
        Self {
            card_id: change.card_id.clone(),
            seq: change.seq,
            previous_column: change.previous_column,
            previous_status: change.previous_status,
            previous_progress: change.previous_progress,
            attempted_status: change.status,
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BoardEvent {
    StatusChanged { change: StatusChange },
    CardViewed { card_id: String },
    PersistFailed { failure: PersistFailure },
}
