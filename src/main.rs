// src/main.rs

use anyhow::Context;
use log::{error, info};
use ruisapp::config::CONFIG;
use ruisapp::create_application;
use std::time::Duration;

/// Main entry point for the `ruisapp` binary.
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let mut argv = std::env::args();
    let executable = argv.next().unwrap_or_else(|| "ruisapp".to_string());
    let args: Vec<String> = argv.collect();

    let mut app = match create_application(&executable, &args) {
        Ok(Some(app)) => app,
        Ok(None) => return Ok(()),
        Err(e) => {
            error!("Startup failed: {:#}", e);
            return Err(e);
        }
    };

    let main_window = app
        .main_window_mut()
        .context("Application started without a main window")?;
    main_window.show();
    info!(
        "Main window '{}' (ID: {}) mapped at {:?}.",
        main_window.title(),
        main_window.id(),
        main_window.size()
    );

    std::thread::sleep(Duration::from_millis(CONFIG.app.linger_ms));
    info!("Exiting.");
    Ok(())
}
