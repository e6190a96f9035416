//! Kanban board drag-and-drop engine.
//!
//! ## Overview
//!
//! The admin project board projects a seven-state project lifecycle onto
//! three visual columns. Cards are dragged between columns; a committed
//! cross-column drop forces the card to its new column's canonical status
//! and fires exactly one outbound status change.
//!
//! ## Module Map
//!
//! ```text
//! ┌──────────┐ gestures ┌──────────────────────────────────────────────────┐
//! │  Host UI │ ───────> │  controller.rs  (KanbanBoard, RollbackPolicy)    │
//! │          │ <─────── │    ├─ session.rs  (DragSession state machine)    │
//! └──────────┘ snapshot │    │      │ move_card / reorder_within_column    │
//!                       │    │      v                                     │
//!                       │    ├─ state.rs    (BoardState, id-keyed cards)   │
//!                       │    │      ^ classify via mapper.rs              │
//!                       │    │                                            │
//!                       │    └─ emitter.rs  (ReconciliationEmitter)        │
//!                       │           │ StatusSink::on_status_change()      │
//!                       └───────────┼──────────────────────────────────────┘
//!                                   v
//!                         persistence collaborator (crate::store)
//! ```
//!
//! ## Supporting Modules
//!
//! | Module     | Responsibility                                          |
//! |------------|---------------------------------------------------------|
//! | `models`   | `Card`, `DetailedStatus`, `Column`, snapshot views      |
//! | `mapper`   | status → column table and canonical pairs               |
//! | `events`   | `BoardInput` gestures, `BoardEvent` notifications       |
//!
//! ## Typical Gesture Flow (drop a card into another column)
//!
//! 1. `drag_start(card)` records the origin column and index.
//! 2. Each `drag_over(id)` resolving to a different column moves the card
//!    there as a preview. Nothing is emitted.
//! 3. `drag_end(Some(id))` places the card and, if its column differs from
//!    the origin, yields a `Commit`.
//! 4. The emitter writes the canonical `(status, progress)` onto the local
//!    card and calls the sink once. Persistence runs asynchronously; a
//!    failure comes back through `KanbanBoard::handle_persist_failure`.
//! 5. Any refresh received during the drag is applied now.

pub mod controller;
pub mod emitter;
pub mod events;
pub mod mapper;
pub mod models;
pub mod session;
pub mod state;

#[cfg(test)]
mod property_tests;

pub use controller::{DispatchOutcome, KanbanBoard, RefreshOutcome, RollbackPolicy};
pub use emitter::{ChannelSink, RecordingSink, ReconciliationEmitter, StatusSink};
pub use events::{BoardEvent, BoardInput, PersistFailure, StatusChange};
pub use models::{BoardView, CanonicalStatus, Card, Column, ColumnView, DetailedStatus};
pub use session::{Commit, DragOutcome, DragPhase, DragSession, DropTarget};
pub use state::{BoardState, MoveOutcome, Placement};
