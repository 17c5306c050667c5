//! OS signal handling.
//!
//! The pool has no shutdown operation of its own; the daemon returns from
//! `main` once a termination signal arrives, which ends every task.

use std::io;

/// Wait for Ctrl+C, or SIGTERM on unix.
pub async fn wait_for_shutdown() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutdown signal received");
    Ok(())
}
