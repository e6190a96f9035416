//! Persistence collaborator boundary.
//!
//! The board never waits on storage. Committed moves leave the engine as
//! `BoardEvent::StatusChanged` through a [`ChannelSink`](crate::board::ChannelSink);
//! a [`PersistWorker`] drains that channel, writes each change through a
//! [`ProjectStore`], and reports failures back as [`PersistFailure`]s on a
//! second channel. Nothing is retried.
//!
//! | Store           | Backing                                        |
//! |-----------------|------------------------------------------------|
//! | `JsonFileStore` | A JSON array of cards, rewritten on each update |
//! | `MemoryStore`   | In-process list with failure injection          |

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::board::events::{BoardEvent, PersistFailure, StatusChange};
use crate::board::models::{Card, DetailedStatus};
use crate::errors::StoreError;

/// Source of truth for project records.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn load_cards(&self) -> Result<Vec<Card>, StoreError>;

    async fn update_status(
        &self,
        card_id: &str,
        status: DetailedStatus,
        progress: u8,
    ) -> Result<(), StoreError>;
}

fn apply_update(
    cards: &mut [Card],
    card_id: &str,
    status: DetailedStatus,
    progress: u8,
) -> Result<(), StoreError> {
    let card = cards
        .iter_mut()
        .find(|c| c.id == card_id)
        .ok_or_else(|| StoreError::CardNotFound {
            card_id: card_id.to_string(),
        })?;
    card.display_status = status;
    card.progress = progress;
    Ok(())
}

// ── JSON file ────────────────────────────────────────────────────────

/// Cards stored as a pretty-printed JSON array on disk.
pub struct JsonFileStore {
    path: PathBuf,
    // serialises read-modify-write cycles
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn read(&self) -> Result<Vec<Card>, StoreError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Sibling file the new contents are staged in before the rename.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Replace the card file atomically: stage, sync, then rename over it.
    async fn write(&self, cards: &[Card]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(cards)?;
        let staging = self.staging_path();
        let staging_error = |source| StoreError::Io {
            path: staging.clone(),
            source,
        };

        let mut file = tokio::fs::File::create(&staging)
            .await
            .map_err(staging_error)?;
        file.write_all(content.as_bytes())
            .await
            .map_err(staging_error)?;
        file.sync_all().await.map_err(staging_error)?;
        drop(file);

        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }
}

#[async_trait]
impl ProjectStore for JsonFileStore {
    async fn load_cards(&self) -> Result<Vec<Card>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    async fn update_status(
        &self,
        card_id: &str,
        status: DetailedStatus,
        progress: u8,
    ) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut cards = self.read().await?;
        apply_update(&mut cards, card_id, status, progress)?;
        self.write(&cards).await?;
        debug!(card_id, status = %status, progress, path = %self.path.display(), "Card file updated");
        Ok(())
    }
}

// ── In memory ────────────────────────────────────────────────────────

/// In-process store. Updates for ids registered with [`MemoryStore::reject`]
/// fail with `StoreError::Rejected`.
#[derive(Default)]
pub struct MemoryStore {
    cards: Mutex<Vec<Card>>,
    rejected: Mutex<HashSet<String>>,
    updates: Mutex<Vec<(String, DetailedStatus, u8)>>,
}

impl MemoryStore {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards: Mutex::new(cards),
            ..Self::default()
        }
    }

    /// Make every future update of `card_id` fail.
    pub async fn reject(&self, card_id: impl Into<String>) {
        self.rejected.lock().await.insert(card_id.into());
    }

    /// Every update attempted so far, including rejected ones.
    pub async fn updates(&self) -> Vec<(String, DetailedStatus, u8)> {
        self.updates.lock().await.clone()
    }

    pub async fn cards(&self) -> Vec<Card> {
        self.cards.lock().await.clone()
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn load_cards(&self) -> Result<Vec<Card>, StoreError> {
        Ok(self.cards.lock().await.clone())
    }

    async fn update_status(
        &self,
        card_id: &str,
        status: DetailedStatus,
        progress: u8,
    ) -> Result<(), StoreError> {
        self.updates
            .lock()
            .await
            .push((card_id.to_string(), status, progress));

        if self.rejected.lock().await.contains(card_id) {
            return Err(StoreError::Rejected {
                card_id: card_id.to_string(),
                message: "update rejected".to_string(),
            });
        }

        let mut cards = self.cards.lock().await;
        apply_update(&mut cards, card_id, status, progress)
    }
}

// ── Worker ───────────────────────────────────────────────────────────

/// Counters returned when a worker's input channel closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistSummary {
    pub persisted: usize,
    pub failed: usize,
}

/// Drains board events and persists each status change once.
pub struct PersistWorker {
    store: Arc<dyn ProjectStore>,
    failures: mpsc::UnboundedSender<PersistFailure>,
}

impl PersistWorker {
    pub fn new(
        store: Arc<dyn ProjectStore>,
    ) -> (Self, mpsc::UnboundedReceiver<PersistFailure>) {
        let (failures, rx) = mpsc::unbounded_channel();
        (Self { store, failures }, rx)
    }

    /// Persist a single change, reporting a failure if the store refuses it.
    pub async fn persist(&self, change: &StatusChange) -> Result<(), StoreError> {
        match self
            .store
            .update_status(&change.card_id, change.status, change.progress)
            .await
        {
            Ok(()) => {
                info!(card_id = %change.card_id, status = %change.status, "Status persisted");
                Ok(())
            }
            Err(e) => {
                error!(card_id = %change.card_id, error = %e, "Failed to persist status change");
                // receiver may be gone; the failure is already logged
                let _ = self
                    .failures
                    .send(PersistFailure::from_change(change, e.to_string()));
                Err(e)
            }
        }
    }

    /// Run until every sender of `events` is dropped.
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<BoardEvent>) -> PersistSummary {
        let mut summary = PersistSummary::default();
        while let Some(event) = events.recv().await {
            let BoardEvent::StatusChanged { change } = event else {
                continue;
            };
            match self.persist(&change).await {
                Ok(()) => summary.persisted += 1,
                Err(_) => summary.failed += 1,
            }
        }
        debug!(
            persisted = summary.persisted,
            failed = summary.failed,
            "Persist worker stopped"
        );
        summary
    }

    pub fn spawn(self, events: mpsc::UnboundedReceiver<BoardEvent>) -> JoinHandle<PersistSummary> {
        tokio::spawn(self.run(events))
    }
}
