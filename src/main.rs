use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use hearth::artifacts::Artifacts;
use hearth::config::Config;
use hearth::index::BlendWeights;
use hearth::server::routes::build_router;
use hearth::server::AppState;
use hearth::session::sweeper::session_sweep_loop;

#[tokio::main]
async fn main() {
    // Load .env
    let _ = dotenvy::dotenv();

    // Load config first (needed for logging setup)
    let config = Config::load(None).expect("failed to load config");

    // Initialize tracing from LoggingConfig
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .init();
        }
    }

    tracing::info!("hearth starting");
    hearth::metrics::init();

    // Artifacts are immutable for the process lifetime; a bad one is fatal.
    let artifacts = match Artifacts::load(&config.artifacts, BlendWeights::from(&config.ranking)) {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(error = %e, "failed to load artifacts, refusing to start");
            std::process::exit(1);
        }
    };

    let state = AppState::new(artifacts, config.clone());

    // Spawn idle session sweeper
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    {
        let sessions = Arc::clone(&state.sessions);
        let ttl = Duration::from_secs(config.sessions.session_ttl_secs);
        let interval = Duration::from_secs(config.sessions.sweep_interval_secs);
        tokio::spawn(async move {
            session_sweep_loop(sessions, ttl, interval, shutdown_rx).await;
        });
    }

    // Build router
    let app = build_router(state);

    // Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(addr = %addr, "listening");

    let listener = TcpListener::bind(&addr)
        .await
        .expect("failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    // Signal shutdown to background tasks
    let _ = shutdown_tx.send(true);
    tracing::info!("hearth stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
