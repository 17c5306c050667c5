//! Notifier that writes every transition to the log.

use futures_util::future::BoxFuture;
use tokio::sync::mpsc;

use crate::monitor::{HostStatus, Notifier};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(self: Box<Self>, mut notify_rx: mpsc::Receiver<HostStatus>) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            while let Some(event) = notify_rx.recv().await {
                if event.down {
                    tracing::warn!(host = %event.host, reason = ?event.reason, "DOWN");
                } else {
                    tracing::info!(host = %event.host, "UP");
                }
            }
            tracing::debug!("Notify channel closed");
        })
    }
}
