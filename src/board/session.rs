//! Drag gesture state machine.
//!
//! # Invariants
//!
//! 1. A session is `Idle`, `Dragging`, or `Cancelled`. `Cancelled` behaves
//!    like `Idle` and is left by the next `drag_start` or `reset`.
//! 2. `drag_start` is only accepted when no drag is active.
//! 3. `drag_over` and `drag_end` are only accepted while `Dragging`; pointer
//!    events arriving after the drop are ignored.
//! 4. `drag_over` only ever moves a card across columns, and never reports a
//!    commit. Only `drag_end` can produce `DragOutcome::Committed`, at most
//!    once per drag.
//! 5. `drag_end(None)` restores the card to its exact origin placement.
//! 6. `drag_end` only reorders inside the origin column. A drop inside a
//!    previewed column leaves the card at its preview position.
//!
//! # Failure Modes
//!
//! | Failure                     | Cause                          | Fallback                          |
//! |-----------------------------|--------------------------------|-----------------------------------|
//! | Unknown card on start       | Stale event after a refresh    | Ignored, stays `Idle`             |
//! | Unresolved hover target     | Pointer over a foreign element | Ignored, preview unchanged        |
//! | Unresolved drop target      | Drop on a foreign element      | Drop at the last preview position |
//! | Dragged card vanished       | Board mutated mid-drag         | Drag discarded, back to `Idle`    |

use tracing::{debug, warn};

use super::models::Column;
use super::state::{BoardState, MoveOutcome, Placement};
use crate::errors::BoardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    Cancelled,
}

impl DragPhase {
    pub fn is_dragging(self) -> bool {
        matches!(self, Self::Dragging)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging => "dragging",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Bookkeeping for the drag in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDrag {
    pub card_id: String,
    pub origin: Placement,
}

/// What an `over_id` from the host UI points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// The column container itself.
    Column(Column),
    /// Another card, at its current placement.
    Card(Placement),
}

impl DropTarget {
    pub fn column(&self) -> Column {
        match self {
            Self::Column(column) => *column,
            Self::Card(placement) => placement.column,
        }
    }
}

/// Resolve an `over_id` to a drop target. Column ids win over card ids.
pub fn resolve_target(board: &BoardState, over_id: &str) -> Result<DropTarget, BoardError> {
    if let Ok(column) = over_id.parse::<Column>() {
        return Ok(DropTarget::Column(column));
    }
    board
        .placement_of(over_id)
        .map(DropTarget::Card)
        .ok_or_else(|| BoardError::UnresolvedTarget {
            over_id: over_id.to_string(),
        })
}

/// A drop that landed in a different column than the drag started in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub card_id: String,
    pub origin: Column,
    pub destination: Column,
    /// Final index inside `destination`.
    pub index: usize,
}

#[derive(Debug)]
pub enum DragOutcome {
    Started {
        card_id: String,
        origin: Placement,
    },
    /// Live cross-column preview performed by `drag_over`.
    Previewed(MoveOutcome),
    /// Hover over the column the card already sits in.
    Unchanged,
    /// Drop back into the origin column. Local only.
    Reordered {
        card_id: String,
        column: Column,
        from_index: usize,
        to_index: usize,
    },
    Committed(Commit),
    Cancelled {
        card_id: String,
        restored: Placement,
    },
    Ignored(BoardError),
}

impl DragOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }

    pub fn commit(&self) -> Option<&Commit> {
        match self {
            Self::Committed(commit) => Some(commit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragSession {
    phase: DragPhase,
    active: Option<ActiveDrag>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase.is_dragging()
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    /// Leave `Cancelled` for `Idle`. No effect while dragging.
    pub fn reset(&mut self) {
        if self.phase == DragPhase::Cancelled {
            self.phase = DragPhase::Idle;
        }
    }

    pub fn drag_start(&mut self, board: &BoardState, card_id: &str) -> DragOutcome {
        if let Some(active) = &self.active {
            warn!(
                card_id,
                active = %active.card_id,
                "Rejecting drag_start while another drag is active"
            );
            return DragOutcome::Ignored(BoardError::DragAlreadyActive {
                card_id: active.card_id.clone(),
            });
        }

        let Some(origin) = board.placement_of(card_id) else {
            warn!(card_id, "drag_start for a card that is not on the board");
            return DragOutcome::Ignored(BoardError::UnknownCard {
                card_id: card_id.to_string(),
            });
        };

        debug!(card_id, column = %origin.column, index = origin.index, "Drag started");
        self.phase = DragPhase::Dragging;
        self.active = Some(ActiveDrag {
            card_id: card_id.to_string(),
            origin,
        });
        DragOutcome::Started {
            card_id: card_id.to_string(),
            origin,
        }
    }

    pub fn drag_over(&mut self, board: &mut BoardState, over_id: &str) -> DragOutcome {
        let Some(active) = self.active.as_ref() else {
            debug!(over_id, "Ignoring drag_over outside a drag");
            return DragOutcome::Ignored(BoardError::NoActiveDrag);
        };

        let Some(current) = board.placement_of(&active.card_id) else {
            warn!(card_id = %active.card_id, "Dragged card vanished from the board, discarding drag");
            let card_id = active.card_id.clone();
            self.finish(DragPhase::Idle);
            return DragOutcome::Ignored(BoardError::UnknownCard { card_id });
        };

        let target = match resolve_target(board, over_id) {
            Ok(target) => target,
            Err(e) => {
                warn!(over_id, error = %e, "Ignoring drag_over with unresolved target");
                return DragOutcome::Ignored(e);
            }
        };

        if target.column() == current.column {
            return DragOutcome::Unchanged;
        }

        let index = match target {
            DropTarget::Column(column) => board.column(column).len(),
            DropTarget::Card(placement) => placement.index,
        };

        match board.move_card(&active.card_id, target.column(), index) {
            Ok(moved) => {
                debug!(
                    card_id = %moved.card_id,
                    from = %moved.from.column,
                    to = %moved.to.column,
                    index = moved.to.index,
                    "Previewed cross-column move"
                );
                DragOutcome::Previewed(moved)
            }
            Err(e) => {
                warn!(error = %e, "Preview move failed");
                DragOutcome::Ignored(e)
            }
        }
    }

    /// Finish the drag. `None` cancels and restores the origin placement.
    pub fn drag_end(&mut self, board: &mut BoardState, over_id: Option<&str>) -> DragOutcome {
        let Some(active) = self.active.clone() else {
            debug!(?over_id, "Ignoring drag_end outside a drag");
            return DragOutcome::Ignored(BoardError::NoActiveDrag);
        };

        let Some(current) = board.placement_of(&active.card_id) else {
            warn!(card_id = %active.card_id, "Dragged card vanished from the board, discarding drag");
            self.finish(DragPhase::Idle);
            return DragOutcome::Ignored(BoardError::UnknownCard {
                card_id: active.card_id,
            });
        };

        let Some(over_id) = over_id else {
            return self.cancel(board, active);
        };

        let destination = match resolve_target(board, over_id) {
            Ok(DropTarget::Card(placement)) => placement,
            Ok(DropTarget::Column(column)) if column == current.column => current,
            Ok(DropTarget::Column(column)) => Placement {
                column,
                index: board.column(column).len(),
            },
            Err(e) => {
                warn!(over_id, error = %e, "Unresolved drop target, keeping last preview position");
                current
            }
        };

        // Reorder only inside the origin column; a drop in a previewed
        // column keeps the preview position.
        let result = if destination.column != current.column {
            board
                .move_card(&active.card_id, destination.column, destination.index)
                .map(|_| ())
        } else if destination.column == active.origin.column {
            board.reorder_within_column(current.column, current.index, destination.index)
        } else {
            Ok(())
        };
        if let Err(e) = result {
            warn!(error = %e, "Drop placement failed, keeping current position");
        }
        let placed = board.placement_of(&active.card_id).unwrap_or(current);

        self.finish(DragPhase::Idle);

        if placed.column == active.origin.column {
            debug!(
                card_id = %active.card_id,
                column = %placed.column,
                from = active.origin.index,
                to = placed.index,
                "Drag ended in origin column"
            );
            DragOutcome::Reordered {
                card_id: active.card_id,
                column: placed.column,
                from_index: active.origin.index,
                to_index: placed.index,
            }
        } else {
            debug!(
                card_id = %active.card_id,
                origin = %active.origin.column,
                destination = %placed.column,
                "Drag committed across columns"
            );
            DragOutcome::Committed(Commit {
                card_id: active.card_id,
                origin: active.origin.column,
                destination: placed.column,
                index: placed.index,
            })
        }
    }

    fn cancel(&mut self, board: &mut BoardState, active: ActiveDrag) -> DragOutcome {
        let restored = match board.move_card(
            &active.card_id,
            active.origin.column,
            active.origin.index,
        ) {
            Ok(moved) => moved.to,
            Err(e) => {
                warn!(error = %e, "Could not restore cancelled drag");
                self.finish(DragPhase::Cancelled);
                return DragOutcome::Ignored(e);
            }
        };
        debug!(card_id = %active.card_id, column = %restored.column, index = restored.index, "Drag cancelled");
        self.finish(DragPhase::Cancelled);
        DragOutcome::Cancelled {
            card_id: active.card_id,
            restored,
        }
    }

    fn finish(&mut self, phase: DragPhase) {
        self.phase = phase;
        self.active = None;
    }
}
