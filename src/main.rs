//! HASH India notification server - Main entry point
//!
//! Loads configuration, wires the SMS transport into the dispatcher and
//! serves it over MCP on stdio.

use anyhow::Result;
use hash_notify::{
    AsyncTwilioTransport, Config, HashNotifyServer, Metrics, NoopTransport, NotificationDispatcher,
    NotificationService, SmsBackend, SmsTransport, TwilioClient,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration before logging so LOG_LEVEL can apply
    let config = Config::from_env();

    let default_level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stderr only, stdout carries MCP traffic
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let metrics = Metrics::new();

    let transport: Arc<dyn SmsTransport> = match config.backend {
        SmsBackend::Twilio => {
            info!("Using Twilio SMS backend at {}", config.twilio_api_url);
            let client = TwilioClient::new(&config).with_metrics(metrics.clone());
            Arc::new(AsyncTwilioTransport::new(client))
        }
        SmsBackend::Noop => {
            warn!("Using noop SMS backend, messages will not be sent");
            Arc::new(NoopTransport::new())
        }
    };

    let dispatcher = NotificationDispatcher::from_config(&config, transport)?
        .with_metrics(metrics.clone());

    info!(
        "Dispatcher ready: sender {}, {} msg/s (burst {}), {} retries",
        dispatcher.sender().masked(),
        config.rate_limit_per_sec,
        config.rate_limit_burst,
        config.max_retries
    );

    let service = Arc::new(dispatcher) as Arc<dyn NotificationService>;
    let server = HashNotifyServer::new(service, metrics);

    info!("Starting MCP server with stdio transport");
    hash_notify::server::run_server(server).await?;

    info!("Notification server shutdown complete");
    Ok(())
}
