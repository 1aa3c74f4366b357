pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;

use crate::cli::Cli;
use crate::config::Configuration;
use crate::inventory::manager::InventoryManager;
use anyhow::Result;

/// Builds the inventory and renders the view `cli` asks for.
pub fn run(cli: &Cli, config: &Configuration) -> Result<String> {
    let inventory = InventoryManager::build(config)?;

    let output = match cli.host.as_deref() {
        Some(name) => inventory.host_json(name)?,
        None => inventory.to_json()?,
    };

    Ok(output)
}
