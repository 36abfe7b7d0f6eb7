//! Terminal client entry point.
mod menu;

use std::io;

use anyhow::{Context, Result};
use ims_infra::{AppConfig, CsvInventoryStorage};
use ims_inventory::{InMemoryInventoryRepository, InventoryService, ThresholdPolicy};

use menu::Menu;

fn main() -> Result<()> {
    ims_observability::init("warn");

    let config = AppConfig::from_env();
    let policy = ThresholdPolicy::new(config.low_stock_threshold)
        .context("invalid low-stock threshold")?;

    tracing::info!(
        data_dir = %config.storage.data_dir.display(),
        threshold = policy.threshold(),
        "starting inventory menu"
    );

    let service = InventoryService::new(
        InMemoryInventoryRepository::new(),
        CsvInventoryStorage::new(config.storage),
        policy,
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(&service, stdin.lock(), stdout.lock()).run()
}
