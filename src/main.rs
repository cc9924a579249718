// Main

mod amf;
mod flv;
mod log;
mod rtmp;
mod server;
mod session;
mod utils;

use std::sync::Arc;

use log::{LogConfig, Logger};
use server::{run_server, RtmpServerConfiguration, RtmpServerContext};

/// Main function
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load .env
    let _ = dotenvy::dotenv();

    // Initialize logger

    let logger = Logger::new(LogConfig::load_from_env());

    // Print version

    const VERSION: &str = env!("CARGO_PKG_VERSION");

    log_info!(logger, format!("RTMP to HTTP-FLV Server ({VERSION})"));

    // Load configuration

    let server_config = match RtmpServerConfiguration::load_from_env(&logger) {
        Ok(c) => Arc::new(c),
        Err(_) => {
            std::process::exit(1);
        }
    };

    // Run server

    run_server(logger, RtmpServerContext::new(server_config)).await;

    // End of main

    Ok(())
}
