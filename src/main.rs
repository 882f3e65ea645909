//! Tapwatch - a suspension-resilient stopwatch
//!
//! Runs the timer engine with its tick driver and wake-up recovery, and
//! serves the HTTP control surface.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use tapwatch::{
    api::create_router,
    clock::{SharedClock, SystemClock},
    config::Config,
    state::AppState,
    tasks::{tick_driver_task, wake_up_recovery_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("tapwatch={},tower_http=info", config.log_level()))
        .init();

    info!("Starting tapwatch v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms, interval={:?}s",
        config.host, config.port, config.tick_ms, config.interval
    );

    let clock: SharedClock = Arc::new(SystemClock);
    let state = Arc::new(AppState::new(&config, clock));

    // Background tasks; aborting the driver releases any live tick subscription
    let driver = tokio::spawn(tick_driver_task(Arc::clone(&state)));
    let recovery = tokio::spawn(wake_up_recovery_task(Arc::clone(&state)));

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /toggle    - Start, pause or resume");
    info!("  POST /reset     - Reset to zero");
    info!("  PUT  /interval  - Set or disable the alert interval");
    info!("  POST /reconcile - Fold a suspension gap");
    info!("  GET  /status    - Current snapshot");
    info!("  GET  /state     - Persisted timer state");
    info!("  GET  /health    - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            result?;
            info!("Shutdown signal received");
        }
    }

    driver.abort();
    recovery.abort();
    info!("Server shutdown complete");
    Ok(())
}
