//! Taskdeck - Entry Point
//!
//! A dashboard for a cluster task/deployment management service. Mirrors
//! backend state into observable in-memory stores and serves rendered views
//! over a local HTTP server.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use taskdeck::app::options::{AppOptions, ServerOptions};
use taskdeck::app::run::run;
use taskdeck::logs::{init_logging, LogOptions};
use taskdeck::settings::Settings;
use taskdeck::utils::version_info;
use taskdeck::workers::poller;

use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        println!("{}", serde_json::to_string_pretty(&version_info()).unwrap());
        return;
    }

    // Retrieve the settings file
    let settings_path = cli_args.get("settings").map(PathBuf::from);
    let settings = match Settings::load(settings_path.as_deref()).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file: {}", e);
            return;
        }
    };
    if let Err(e) = settings.validate() {
        eprintln!("Invalid settings: {}", e);
        return;
    }

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            println!("Failed to initialize logging: {e}");
            None
        }
    };

    // Run the dashboard
    let options = AppOptions {
        backend_base_url: settings.backend.base_url.clone(),
        app_id: settings.app_id.clone(),
        enable_server: settings.enable_server,
        enable_poller: settings.enable_poller,
        server: ServerOptions {
            host: settings.server.host.clone(),
            port: settings.server.port,
        },
        poller: poller::Options {
            interval: Duration::from_secs(settings.polling_interval_secs),
            ..Default::default()
        },
        ..Default::default()
    };

    info!("Running Taskdeck with options: {:?}", options);
    if let Err(e) = run(options, await_shutdown_signal()).await {
        error!("Failed to run the dashboard: {e}");
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).unwrap();
        let mut sigint = signal(SignalKind::interrupt()).unwrap();

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("Ctrl+C received, shutting down...");
    }
}
