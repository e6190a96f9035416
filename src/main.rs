use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use portal_board::config::{CONFIG_FILE, PortalConfig};
use portal_board::logging;

mod cmd;

#[derive(Parser)]
#[command(name = "portal-board")]
#[command(version, about = "Kanban project board engine")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to portal-board.toml
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the board built from a card file
    Show {
        /// Card file (JSON array). Defaults to persistence.cards_path
        #[arg(long)]
        cards: Option<PathBuf>,

        /// Print the board snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay a gesture script against the board
    Replay {
        /// Gesture script: a JSON array or one JSON object per line
        #[arg(long)]
        events: PathBuf,

        /// Card file (JSON array). Defaults to persistence.cards_path
        #[arg(long)]
        cards: Option<PathBuf>,

        /// Write committed status changes back to the card file
        #[arg(long)]
        persist: bool,

        /// Print the final board as JSON
        #[arg(long)]
        json: bool,
    },
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a default portal-board.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PortalConfig::load_or_default(&cli.config)?;
    config.apply_env()?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging);

    match &cli.command {
        Commands::Show { cards, json } => {
            cmd::cmd_show(&config, cards.as_deref(), *json).await?;
        }
        Commands::Replay {
            events,
            cards,
            persist,
            json,
        } => {
            cmd::cmd_replay(&config, events, cards.as_deref(), *persist, *json).await?;
        }
        Commands::Config { command } => cmd::cmd_config(&cli.config, &config, command.clone())?,
    }

    Ok(())
}
