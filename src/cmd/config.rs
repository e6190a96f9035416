//! Configuration view and init commands (`portal-board config`).

use anyhow::{Context, Result};
use std::path::Path;

use portal_board::config::PortalConfig;

use super::super::ConfigCommands;

pub fn cmd_config(
    config_path: &Path,
    effective: &PortalConfig,
    command: Option<ConfigCommands>,
) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Portal Board Configuration");
            println!("==========================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No config file at {}, using defaults.", config_path.display());
            }
            println!();
            println!("Effective values (with env/CLI overrides):");
            println!();

            let rendered =
                toml::to_string_pretty(effective).context("Failed to render configuration")?;
            println!("{}", rendered.trim_end());
            println!();
        }
        Some(ConfigCommands::Init { force }) => {
            if config_path.exists() && !force {
                println!(
                    "portal-board.toml already exists at {}",
                    config_path.display()
                );
                println!("Pass --force to overwrite it.");
                return Ok(());
            }

            PortalConfig::default().save(config_path)?;

            println!("Created portal-board.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [logging] level, format");
            println!("  - [persistence] rollback_on_failure, cards_path");
            println!();
        }
    }

    Ok(())
}
