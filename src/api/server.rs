//! API Server
//!
//! HTTP server setup: middleware stack, graceful shutdown, startup logging.

use super::{
    handlers::AppState,
    middleware::{cors_layer, request_id_middleware},
    routes::create_router,
};
use crate::config::ServerConfig;
use crate::game::GameSession;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

pub struct ApiServer {
    config: ServerConfig,
    session: Arc<GameSession>,
}

impl ApiServer {
    pub fn new(config: ServerConfig, session: Arc<GameSession>) -> Self {
        Self { config, session }
    }

    /// Start the API server and block until shutdown.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.create_app();
        let addr = self.socket_addr()?;

        info!("🌐 Starting colorbet API server");
        info!("   Listen: http://{}", addr);
        self.log_server_info();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("✅ API server running");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("🛑 API server stopped gracefully");
        Ok(())
    }

    /// Application with the middleware stack applied.
    fn create_app(&self) -> axum::Router {
        let state = Arc::new(AppState {
            session: Arc::clone(&self.session),
            version: env!("CARGO_PKG_VERSION").to_string(),
        });

        create_router(state)
            // Request ID middleware (first for tracing)
            .layer(axum::middleware::from_fn(request_id_middleware))
            // CORS layer (before timeout to handle preflight)
            .layer(cors_layer(self.config.allowed_origins.clone()))
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.request_timeout_secs,
            )))
            // Tracing layer (last for complete request tracing)
            .layer(TraceLayer::new_for_http())
    }

    fn socket_addr(&self) -> Result<SocketAddr, Box<dyn std::error::Error>> {
        Ok(SocketAddr::from((
            self.config.host.parse::<std::net::IpAddr>()?,
            self.config.port,
        )))
    }

    fn log_server_info(&self) {
        info!("📋 Server configuration:");
        info!("   CORS: {:?}", self.config.allowed_origins);
        info!("   Request timeout: {}s", self.config.request_timeout_secs);
        info!("📊 Available endpoints:");
        info!("   GET  /health                      - Health check");
        info!("   GET  /game                        - Round state + timer");
        info!("   POST /game/bet                    - Place a bet");
        info!("   POST /accounts                    - Create account");
        info!("   GET  /accounts/:username/balance  - Account balance");
        info!("   GET  /accounts/:username/bets     - Bet history");
        info!("   GET  /rounds                      - Settled rounds");
        info!("   POST /recharges                   - Request recharge");
        info!("   GET  /recharges                   - List recharges");
        info!("   POST /recharges/:id/approve       - Approve recharge");
        info!("   GET  /reconciliation              - Parked payouts");
    }
}

/// Wait for shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
