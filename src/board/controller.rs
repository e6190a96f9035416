//! `KanbanBoard`, the one object the host UI talks to.
//!
//! Routes gestures through the drag session, hands commits to the emitter,
//! and sequences everything that must not land mid-gesture: authoritative
//! refreshes and persist-failure rollbacks are queued while a drag is active
//! and applied as soon as the session is idle again.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::emitter::{ReconciliationEmitter, StatusSink};
use super::events::{BoardInput, PersistFailure};
use super::mapper::to_column;
use super::models::{BoardView, Card};
use super::session::{DragOutcome, DragSession};
use super::state::BoardState;

/// What to do with the local board when persisting a move fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollbackPolicy {
    /// Leave the optimistic move in place until the next refresh.
    #[default]
    Keep,
    /// Move the card back and restore its previous status.
    Revert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A drag is active; the list is applied when it ends.
    Deferred,
}

#[derive(Debug)]
pub enum DispatchOutcome {
    Drag(DragOutcome),
    Refresh(RefreshOutcome),
    Viewed(bool),
}

pub struct KanbanBoard {
    state: BoardState,
    session: DragSession,
    emitter: ReconciliationEmitter,
    rollback: RollbackPolicy,
    pending_refresh: Option<Vec<Card>>,
    pending_failures: Vec<PersistFailure>,
}

impl KanbanBoard {
    pub fn new(cards: &[Card], sink: Arc<dyn StatusSink>) -> Self {
        Self {
            state: BoardState::build_from_cards(cards),
            session: DragSession::new(),
            emitter: ReconciliationEmitter::new(sink),
            rollback: RollbackPolicy::default(),
            pending_refresh: None,
            pending_failures: Vec::new(),
        }
    }

    pub fn with_rollback_policy(mut self, policy: RollbackPolicy) -> Self {
        self.rollback = policy;
        self
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn snapshot(&self) -> BoardView {
        self.state.snapshot()
    }

    /// Status changes emitted since construction.
    pub fn emitted(&self) -> u64 {
        self.emitter.emitted()
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.pending_refresh.is_some()
    }

    /// Replace the board with an authoritative card list, or queue it if a
    /// drag is active. A newer queued list replaces an older one.
    pub fn refresh(&mut self, cards: Vec<Card>) -> RefreshOutcome {
        if self.session.is_dragging() {
            debug!(cards = cards.len(), "Deferring refresh until the drag ends");
            self.pending_refresh = Some(cards);
            return RefreshOutcome::Deferred;
        }
        self.apply_refresh(&cards);
        RefreshOutcome::Applied
    }

    pub fn drag_start(&mut self, card_id: &str) -> DragOutcome {
        self.session.reset();
        self.session.drag_start(&self.state, card_id)
    }

    pub fn drag_over(&mut self, over_id: &str) -> DragOutcome {
        self.session.drag_over(&mut self.state, over_id)
    }

    pub fn drag_end(&mut self, over_id: Option<&str>) -> DragOutcome {
        let outcome = self.session.drag_end(&mut self.state, over_id);
        if let Some(commit) = outcome.commit() {
            self.emitter.on_commit(&mut self.state, commit);
        }
        if !self.session.is_dragging() {
            self.settle();
        }
        outcome
    }

    /// Forward a details request for a known card. Returns whether it was
    /// forwarded.
    pub fn view_card(&self, card_id: &str) -> bool {
        if !self.state.contains(card_id) {
            warn!(card_id, "view_card for a card that is not on the board");
            return false;
        }
        self.emitter.sink().on_view_card(card_id);
        true
    }

    /// Hook for a rejected `StatusChange`. Returns `true` if the local board
    /// was rolled back right away.
    pub fn handle_persist_failure(&mut self, failure: PersistFailure) -> bool {
        warn!(
            card_id = %failure.card_id,
            previous_column = %failure.previous_column,
            error = %failure.error,
            "Persisting status change failed"
        );
        if self.rollback == RollbackPolicy::Keep {
            return false;
        }
        if self.session.is_dragging() {
            self.pending_failures.push(failure);
            return false;
        }
        self.revert(&failure)
    }

    pub fn dispatch(&mut self, input: BoardInput) -> DispatchOutcome {
        match input {
            BoardInput::DragStart { card_id } => DispatchOutcome::Drag(self.drag_start(&card_id)),
            BoardInput::DragOver { over_id } => DispatchOutcome::Drag(self.drag_over(&over_id)),
            BoardInput::DragEnd { over_id } => {
                DispatchOutcome::Drag(self.drag_end(over_id.as_deref()))
            }
            BoardInput::Refresh { cards } => DispatchOutcome::Refresh(self.refresh(cards)),
            BoardInput::ViewCard { card_id } => DispatchOutcome::Viewed(self.view_card(&card_id)),
        }
    }

    fn settle(&mut self) {
        if let Some(cards) = self.pending_refresh.take() {
            if !self.pending_failures.is_empty() {
                debug!(
                    dropped = self.pending_failures.len(),
                    "Refresh supersedes queued rollbacks"
                );
                self.pending_failures.clear();
            }
            self.apply_refresh(&cards);
            return;
        }
        for failure in std::mem::take(&mut self.pending_failures) {
            self.revert(&failure);
        }
    }

    fn apply_refresh(&mut self, cards: &[Card]) {
        self.state.rebuild(cards);
        self.emitter.forget_all();
        info!(cards = self.state.len(), "Applied board refresh");
    }

    fn revert(&mut self, failure: &PersistFailure) -> bool {
        // Only undo the card's latest commit, and only while the card still
        // sits where that move put it.
        let latest = self.emitter.latest_commit(&failure.card_id);
        if latest != Some(failure.seq) {
            warn!(
                card_id = %failure.card_id,
                seq = failure.seq,
                latest = ?latest,
                "Failure is for a superseded commit, not rolling back"
            );
            return false;
        }
        let expected = to_column(failure.attempted_status);
        if self.state.column_of(&failure.card_id) != Some(expected) {
            warn!(card_id = %failure.card_id, "Card moved again since the failed update, not rolling back");
            return false;
        }
        let end = self.state.column(failure.previous_column).len();
        if let Err(e) = self
            .state
            .move_card(&failure.card_id, failure.previous_column, end)
        {
            warn!(error = %e, "Rollback move failed");
            return false;
        }
        if let Err(e) = self.state.set_status(
            &failure.card_id,
            failure.previous_status,
            failure.previous_progress,
        ) {
            warn!(error = %e, "Rollback status restore failed");
            return false;
        }
        self.emitter.forget(&failure.card_id);
        info!(card_id = %failure.card_id, column = %failure.previous_column, "Rolled back failed move");
        true
    }
}
