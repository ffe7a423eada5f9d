//! Colorbet API Server Binary
//!
//! Loads configuration, wires the game session, and serves the HTTP API.

use clap::Parser;
use colorbet::api::ApiServer;
use colorbet::config::ServiceConfig;
use colorbet::game::GameSession;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "colorbet")]
#[command(about = "Colorbet betting round server", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<String>,

    /// API server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// API server port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Round duration in seconds (overrides config)
    #[arg(long)]
    round_duration: Option<u64>,

    /// Allowed CORS origins (comma-separated, use * for all)
    #[arg(long)]
    cors_origins: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colorbet=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("📂 Loading configuration: {}", path);
            ServiceConfig::from_file(path)?
        }
        None => ServiceConfig::default(),
    };

    // CLI overrides on top of the file/defaults.
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(duration) = args.round_duration {
        config.round.duration_secs = duration;
    }
    if let Some(origins) = args.cors_origins {
        config.server.allowed_origins = origins
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();
    }
    if let Some(timeout) = args.timeout {
        config.server.request_timeout_secs = timeout;
    }
    config.validate()?;

    info!(
        "🎲 Round duration: {}s, seed: {}",
        config.round.duration_secs,
        config
            .round
            .rng_seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "entropy".to_string())
    );

    let session = Arc::new(GameSession::with_defaults(&config.round));
    let server = ApiServer::new(config.server, session);
    server.run().await?;

    Ok(())
}
