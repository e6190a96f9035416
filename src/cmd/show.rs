//! Board rendering (`portal-board show`).

use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};

use portal_board::board::{BoardState, BoardView, Card};
use portal_board::config::PortalConfig;
use portal_board::store::{JsonFileStore, ProjectStore};

/// `--cards` if given, else the configured card file.
pub fn cards_path(config: &PortalConfig, cards: Option<&Path>) -> PathBuf {
    cards
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.persistence.cards_path.clone())
}

pub async fn load_cards(path: &Path) -> Result<Vec<Card>> {
    JsonFileStore::new(path)
        .load_cards()
        .await
        .with_context(|| format!("Failed to load cards from {}", path.display()))
}

pub fn print_board(view: &BoardView, json: bool) -> Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(view).context("Failed to serialize board snapshot")?;
        println!("{}", rendered);
        return Ok(());
    }

    for column in &view.columns {
        println!();
        println!(
            "{} {}",
            style(column.name.title()).bold().cyan(),
            style(format!("({})", column.cards.len())).dim()
        );
        if column.cards.is_empty() {
            println!("  {}", style("(empty)").dim());
        }
        for card in &column.cards {
            println!(
                "  {:<12} {:<24} {} {}%",
                card.id,
                card.name(),
                card.display_status,
                card.progress
            );
        }
    }
    println!();
    Ok(())
}

pub async fn cmd_show(config: &PortalConfig, cards: Option<&Path>, json: bool) -> Result<()> {
    let path = cards_path(config, cards);
    let cards = load_cards(&path).await?;
    let board = BoardState::build_from_cards(&cards);
    print_board(&board.snapshot(), json)
}
