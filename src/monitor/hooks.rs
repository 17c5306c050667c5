//! Collaborator contracts between the pool and the outside world.
//!
//! Each collaborator is handed its channel ends once, when the pool
//! starts, and runs as its own task. Channel direction is fixed by type:
//! loaders and receivers only produce requests, notifiers only consume
//! events. Async closures of the matching shape implement the traits.

use futures_util::future::BoxFuture;
use std::future::Future;
use tokio::sync::mpsc;

use crate::monitor::status::HostStatus;

/// Feeds the initial batch of hosts at boot.
pub trait Loader: Send + 'static {
    fn load(self: Box<Self>, start_tx: mpsc::Sender<HostStatus>) -> BoxFuture<'static, ()>;
}

/// Translates an external control surface into start/stop requests.
pub trait Receiver: Send + 'static {
    fn receive(
        self: Box<Self>,
        start_tx: mpsc::Sender<HostStatus>,
        stop_tx: mpsc::Sender<HostStatus>,
    ) -> BoxFuture<'static, ()>;
}

/// Drains UP/DOWN transition events.
///
/// Must keep up with the monitors: a full notify channel stalls whichever
/// monitor is transitioning.
pub trait Notifier: Send + 'static {
    fn notify(self: Box<Self>, notify_rx: mpsc::Receiver<HostStatus>) -> BoxFuture<'static, ()>;
}

impl<F, Fut> Loader for F
where
    F: FnOnce(mpsc::Sender<HostStatus>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn load(self: Box<Self>, start_tx: mpsc::Sender<HostStatus>) -> BoxFuture<'static, ()> {
        Box::pin((*self)(start_tx))
    }
}

impl<F, Fut> Receiver for F
where
    F: FnOnce(mpsc::Sender<HostStatus>, mpsc::Sender<HostStatus>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn receive(
        self: Box<Self>,
        start_tx: mpsc::Sender<HostStatus>,
        stop_tx: mpsc::Sender<HostStatus>,
    ) -> BoxFuture<'static, ()> {
        Box::pin((*self)(start_tx, stop_tx))
    }
}

impl<F, Fut> Notifier for F
where
    F: FnOnce(mpsc::Receiver<HostStatus>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn notify(self: Box<Self>, notify_rx: mpsc::Receiver<HostStatus>) -> BoxFuture<'static, ()> {
        Box::pin((*self)(notify_rx))
    }
}
