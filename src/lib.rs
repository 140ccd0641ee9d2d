pub mod chart;
pub mod config;
pub mod db;
pub mod generator;
pub mod poll;
pub mod setpoint;
pub mod settings;
pub mod source;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use log::info;

use config::AppConfig;
use db::Database;
use generator::{GeneratorController, ReadingSynth};
use setpoint::SetpointAccessor;
use settings::SettingsStore;
use ui::{App, EventHandler};

/// Dashboard entry point: terminal UI over the readings database.
pub async fn run() -> Result<()> {
    let (config, origin) = AppConfig::load_or_default()?;
    utils::logging::init_file(&config.logging.file, &config.logging.level)?;

    info!("DHT dashboard starting up (config: {origin})...");

    let database = Database::new(config.database.path.clone())?;
    info!("Using database {}", database.path().display());

    if let Some(seed) = config.setpoint {
        SetpointAccessor::new(database.clone())
            .initialize(seed.to_setpoint())
            .await
            .context("failed to seed setpoint")?;
    }

    let settings = SettingsStore::new(config.dashboard.settings_path.clone())?;
    let app = App::new(database, config.panels, settings);

    let terminal = ratatui::init();
    let result = app.run(terminal, EventHandler::new()).await;
    ratatui::restore();

    info!("DHT dashboard shut down");
    result
}

/// Generator entry point: append synthetic readings until Ctrl+C.
pub async fn run_generator() -> Result<()> {
    let (config, origin) = AppConfig::load_or_default()?;
    utils::logging::init_stderr(&config.logging.level);

    info!("Reading generator starting up (config: {origin})...");

    let database = Database::new(config.database.path.clone())?;
    info!("Writing to {}", database.path().display());

    let mut controller = GeneratorController::new();
    controller.start(
        database.clone(),
        ReadingSynth::new(&config.generator),
        config.generator.period(),
    )?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("Ctrl+C received, stopping generator");

    let stats = controller.stop().await?;
    info!(
        "Generator stopped: {} readings inserted, {} failed",
        stats.inserted, stats.failed
    );

    // Last handle: joins the worker thread and closes the connection.
    drop(database);
    info!("Database connection closed");
    Ok(())
}
