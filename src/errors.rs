//! Typed error hierarchy for the portal board.
//!
//! Two top-level enums cover the two subsystems:
//! - `BoardError`: board engine failures (state, drag session, parsing)
//! - `StoreError`: persistence collaborator failures

use thiserror::Error;

use crate::board::models::Column;

/// Errors from the board engine.
///
/// None of these are ever raised into the host UI's event loop: the drag
/// session logs them and reports the event as ignored.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Card {card_id} is not on the board")]
    UnknownCard { card_id: String },

    #[error("Drop target '{over_id}' is neither a column nor a card")]
    UnresolvedTarget { over_id: String },

    #[error("A drag of card {card_id} is already in progress")]
    DragAlreadyActive { card_id: String },

    #[error("No drag is in progress")]
    NoActiveDrag,

    #[error("Index {index} out of range for column {column} of length {len}")]
    IndexOutOfRange {
        column: Column,
        index: usize,
        len: usize,
    },

    #[error("Invalid status '{value}'")]
    InvalidStatus { value: String },

    #[error("Invalid column '{value}'")]
    InvalidColumn { value: String },

    #[error("Card {card_id} has progress {value}, expected 0-100")]
    InvalidProgress { card_id: String, value: u8 },

    #[error("Card {card_id} appears more than once")]
    DuplicateCard { card_id: String },
}

/// Errors from the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Card {card_id} not found in store")]
    CardNotFound { card_id: String },

    #[error("Store I/O failed at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store data is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store rejected update for card {card_id}: {message}")]
    Rejected { card_id: String, message: String },
}
