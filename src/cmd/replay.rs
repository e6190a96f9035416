//! Gesture script replay (`portal-board replay`).
//!
//! Runs each scripted input through `KanbanBoard`, prints every outbound
//! `BoardEvent` as one JSON line on stdout, then the final board.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use portal_board::board::{BoardEvent, BoardInput, ChannelSink, DispatchOutcome, KanbanBoard};
use portal_board::config::PortalConfig;
use portal_board::store::{JsonFileStore, PersistWorker};

use super::show::{cards_path, load_cards, print_board};

/// Parse a script written either as a JSON array or as JSON lines.
pub fn parse_script(content: &str) -> Result<Vec<BoardInput>> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("Failed to parse gesture script");
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Failed to parse gesture script line {}", i + 1))
        })
        .collect()
}

fn print_event(event: &BoardEvent) -> Result<()> {
    let line = serde_json::to_string(event).context("Failed to serialize board event")?;
    println!("{}", line);
    Ok(())
}

pub async fn cmd_replay(
    config: &PortalConfig,
    events: &Path,
    cards: Option<&Path>,
    persist: bool,
    json: bool,
) -> Result<()> {
    let script = std::fs::read_to_string(events)
        .with_context(|| format!("Failed to read gesture script: {}", events.display()))?;
    let inputs = parse_script(&script)?;

    let path = cards_path(config, cards);
    let cards = load_cards(&path).await?;

    let (sink, mut outbound) = ChannelSink::channel();
    let mut board =
        KanbanBoard::new(&cards, Arc::new(sink)).with_rollback_policy(config.rollback_policy());

    let mut persistence = if persist {
        let store = Arc::new(JsonFileStore::new(&path));
        Some(PersistWorker::new(store))
    } else {
        None
    };

    for (step, input) in inputs.into_iter().enumerate() {
        match board.dispatch(input) {
            DispatchOutcome::Drag(outcome) if outcome.is_ignored() => {
                debug!(step, ?outcome, "Scripted gesture ignored");
            }
            DispatchOutcome::Viewed(false) => {
                debug!(step, "Scripted view_card ignored");
            }
            _ => {}
        }

        while let Ok(event) = outbound.try_recv() {
            print_event(&event)?;

            let BoardEvent::StatusChanged { change } = &event else {
                continue;
            };
            let Some((worker, failures)) = persistence.as_mut() else {
                continue;
            };
            if worker.persist(change).await.is_ok() {
                continue;
            }
            while let Ok(failure) = failures.try_recv() {
                print_event(&BoardEvent::PersistFailed {
                    failure: failure.clone(),
                })?;
                if board.handle_persist_failure(failure) {
                    warn!(step, "Rolled back failed move");
                }
            }
        }
    }

    print_board(&board.snapshot(), json)
}
