use std::path::Path;

use tracing::{error, info};

use dropbox_web::{Config, WebServer};

/// Configuration file read from the working directory.
const CONFIG_FILE: &str = "config.toml";

#[tokio::main]
async fn main() {
    // Load configuration
    let mut config = if Path::new(CONFIG_FILE).exists() {
        match Config::load(CONFIG_FILE) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {CONFIG_FILE}: {e}");
                eprintln!("Using default configuration.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Initialize logging
    if let Err(e) = dropbox_web::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        dropbox_web::logging::init_console_only(&config.logging.level);
    }

    config.apply_env_overrides();
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("Dropbox Web Manager");
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    let server = match WebServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
