//! Signal handling and the bounded drain after Ctrl+C / SIGTERM

use std::future::Future;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info, warn};

/// How the server stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every open connection finished
    Drained,
    /// The drain deadline passed with requests still running
    Forced,
}

/// Resolve on the first Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Run `serve` to completion, but give it at most `timeout` once
/// `shutdown_started` resolves
///
/// `serve` is the graceful-shutdown server future; a request stuck on the
/// microphone or speaker would otherwise keep it pending forever.
///
/// # Errors
///
/// Returns the server's own I/O error.
pub async fn serve_until_drained<S, T>(
    serve: S,
    shutdown_started: T,
    timeout: Duration,
) -> std::io::Result<ShutdownOutcome>
where
    S: Future<Output = std::io::Result<()>>,
    T: Future<Output = ()>,
{
    tokio::pin!(serve);

    tokio::select! {
        result = &mut serve => return result.map(|()| ShutdownOutcome::Drained),
        () = shutdown_started => {},
    }

    info!("⏳ Waiting up to {:?} for connections to close...", timeout);
    if let Ok(result) = tokio::time::timeout(timeout, &mut serve).await {
        result.map(|()| ShutdownOutcome::Drained)
    } else {
        warn!(
            timeout_secs = timeout.as_secs(),
            "Connections still open after the drain timeout, forcing shutdown"
        );
        Ok(ShutdownOutcome::Forced)
    }
}
