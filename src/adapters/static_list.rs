//! Loader for a fixed host list (config file and command line).

use futures_util::future::BoxFuture;
use tokio::sync::mpsc;

use crate::monitor::{HostStatus, Loader};

#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    hosts: Vec<HostStatus>,
}

impl StaticLoader {
    /// Every host starts believed UP.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(HostStatus::up).collect(),
        }
    }

    /// Load hosts with explicit initial states.
    pub fn from_statuses(hosts: Vec<HostStatus>) -> Self {
        Self { hosts }
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl Loader for StaticLoader {
    fn load(self: Box<Self>, start_tx: mpsc::Sender<HostStatus>) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            let total = self.hosts.len();
            for status in self.hosts {
                if start_tx.send(status).await.is_err() {
                    tracing::warn!("Pool closed while loading hosts");
                    return;
                }
            }
            tracing::info!(hosts = total, "BOOT hosts loaded");
        })
    }
}
