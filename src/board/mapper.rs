//! Status ↔ column mapping.
//!
//! Seven detailed lifecycle statuses collapse onto three visual columns:
//!
//! | Detailed status                   | Column      |
//! |-----------------------------------|-------------|
//! | pending, on-hold, cancelled       | pending     |
//! | approved, in-progress, review     | in-progress |
//! | completed                         | completed   |
//!
//! Dropping a card into a new column forces it to that column's canonical
//! pair: `pending → (pending, 0)`, `in-progress → (in-progress, 50)`,
//! `completed → (completed, 100)`.

use super::models::{CanonicalStatus, Column, DetailedStatus};

/// Column a detailed status is displayed in. Total over all statuses.
pub fn to_column(status: DetailedStatus) -> Column {
    match status {
        DetailedStatus::Pending | DetailedStatus::OnHold | DetailedStatus::Cancelled => {
            Column::Pending
        }
        DetailedStatus::Approved | DetailedStatus::InProgress | DetailedStatus::Review => {
            Column::InProgress
        }
        DetailedStatus::Completed => Column::Completed,
    }
}

/// Canonical `(status, progress)` assigned on a cross-column drop.
pub fn to_canonical(column: Column) -> CanonicalStatus {
    match column {
        Column::Pending => CanonicalStatus {
            status: DetailedStatus::Pending,
            progress: 0,
        },
        Column::InProgress => CanonicalStatus {
            status: DetailedStatus::InProgress,
            progress: 50,
        },
        Column::Completed => CanonicalStatus {
            status: DetailedStatus::Completed,
            progress: 100,
        },
    }
}

/// Whether `status` is the canonical status of its own column.
pub fn is_canonical(status: DetailedStatus) -> bool {
    to_canonical(to_column(status)).status == status
}
