//! Signal handling for graceful shutdown

use anyhow::Context;
use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for the first shutdown signal (SIGTERM, SIGINT)
pub async fn shutdown_signal() -> anyhow::Result<()> {
    let mut signals = Signals::new([SIGTERM, SIGINT])
        .context("failed to install signal handler")?;
    let handle = signals.handle();

    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }

    handle.close();
    Ok(())
}
