use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::events::{BoardEvent, StatusChange};
use super::mapper::to_canonical;
use super::session::Commit;
use super::state::BoardState;

/// Outbound seam to the persistence collaborator and the host UI.
///
/// Implementations must not block: the call happens inside the pointer-up
/// handler.
pub trait StatusSink: Send + Sync {
    /// A committed cross-column move. Called at most once per drop.
    fn on_status_change(&self, change: &StatusChange);

    /// The user asked for a card's details.
    fn on_view_card(&self, _card_id: &str) {}
}

/// Turns committed drags into exactly one `StatusChange` each.
///
/// Each change gets the next commit number as its `seq`; the emitter keeps
/// the latest `seq` per card so late persistence failures can be matched
/// against the card's most recent commit.
pub struct ReconciliationEmitter {
    sink: Arc<dyn StatusSink>,
    emitted: u64,
    latest: HashMap<String, u64>,
}

impl ReconciliationEmitter {
    pub fn new(sink: Arc<dyn StatusSink>) -> Self {
        Self {
            sink,
            emitted: 0,
            latest: HashMap::new(),
        }
    }

    pub fn sink(&self) -> &Arc<dyn StatusSink> {
        &self.sink
    }

    /// Number of notifications sent so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// `seq` of the most recent change emitted for `card_id`.
    pub fn latest_commit(&self, card_id: &str) -> Option<u64> {
        self.latest.get(card_id).copied()
    }

    /// Stop tracking one card, e.g. after its failed move was rolled back.
    pub fn forget(&mut self, card_id: &str) {
        self.latest.remove(card_id);
    }

    /// Stop tracking every card. An authoritative refresh supersedes all
    /// in-flight commits.
    pub fn forget_all(&mut self) {
        self.latest.clear();
    }

    /// Apply the destination column's canonical status to the local card and
    /// notify the sink. Returns the change that was sent, if any.
    pub fn on_commit(&mut self, board: &mut BoardState, commit: &Commit) -> Option<StatusChange> {
        if commit.origin == commit.destination {
            debug!(card_id = %commit.card_id, "Commit within origin column, nothing to emit");
            return None;
        }

        let canonical = to_canonical(commit.destination);
        let (previous_status, previous_progress) =
            match board.set_status(&commit.card_id, canonical.status, canonical.progress) {
                Ok(previous) => previous,
                Err(e) => {
                    warn!(error = %e, "Committed card is no longer on the board");
                    return None;
                }
            };

        let seq = self.emitted + 1;
        let change = StatusChange {
            card_id: commit.card_id.clone(),
            seq,
            status: canonical.status,
            progress: canonical.progress,
            previous_column: commit.origin,
            previous_status,
            previous_progress,
        };
        info!(
            card_id = %change.card_id,
            status = %change.status,
            progress = change.progress,
            from = %commit.origin,
            seq,
            "Emitting status change"
        );
        self.sink.on_status_change(&change);
        self.emitted = seq;
        self.latest.insert(change.card_id.clone(), seq);
        Some(change)
    }
}

/// Forwards notifications into an unbounded channel, fire-and-forget.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<BoardEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<BoardEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BoardEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: BoardEvent) {
        if self.tx.send(event).is_err() {
            warn!("Board event receiver dropped, notification lost");
        }
    }
}

impl StatusSink for ChannelSink {
    fn on_status_change(&self, change: &StatusChange) {
        self.send(BoardEvent::StatusChanged {
            change: change.clone(),
        });
    }

    fn on_view_card(&self, card_id: &str) {
        self.send(BoardEvent::CardViewed {
            card_id: card_id.to_string(),
        });
    }
}

/// Keeps every notification in memory. Handy for tests and dry runs.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<BoardEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BoardEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn status_changes(&self) -> Vec<StatusChange> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BoardEvent::StatusChanged { change } => Some(change),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: BoardEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

impl StatusSink for RecordingSink {
    fn on_status_change(&self, change: &StatusChange) {
        self.push(BoardEvent::StatusChanged {
            change: change.clone(),
        });
    }

    fn on_view_card(&self, card_id: &str) {
        self.push(BoardEvent::CardViewed {
            card_id: card_id.to_string(),
        });
    }
}
