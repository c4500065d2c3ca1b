//! Tokio actor that owns the [`Model`].
//!
//! All state mutation happens on one task: messages come in over an mpsc
//! channel, provider calls run on spawned tasks and report back as
//! messages, and every processed message publishes a fresh [`Snapshot`] on
//! a `watch` channel for the rendering layer.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::app::{update, Command, Model, Msg, Snapshot};
use crate::feed::PositionFeed;
use crate::provider::{RescueRouteProvider, RiskQueryService, RouteProvider};

const MAILBOX_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("navigator task has shut down")]
pub struct NavigatorClosed;

/// Everything the navigator needs from the outside world.
pub trait Backend: RouteProvider + RescueRouteProvider + RiskQueryService + 'static {}

impl<T> Backend for T where T: RouteProvider + RescueRouteProvider + RiskQueryService + 'static {}

#[derive(Clone)]
pub struct NavigatorHandle {
    mailbox: mpsc::Sender<Msg>,
    snapshots: watch::Receiver<Snapshot>,
}

impl NavigatorHandle {
    pub async fn send(&self, msg: Msg) -> Result<(), NavigatorClosed> {
        self.mailbox.send(msg).await.map_err(|_| NavigatorClosed)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }
}

/// Start the navigator. The task ends once every [`NavigatorHandle`] is
/// dropped and in-flight provider calls have reported back; navigation is
/// stopped on the way out.
pub fn spawn<F, B>(model: Model<F>, backend: Arc<B>) -> (NavigatorHandle, JoinHandle<()>)
where
    F: PositionFeed + 'static,
    B: Backend,
{
    let (mailbox, inbox) = mpsc::channel(MAILBOX_CAPACITY);
    let (publisher, snapshots) = watch::channel(model.snapshot());
    let weak = mailbox.downgrade();

    let task = tokio::spawn(run(model, backend, inbox, weak, publisher));

    (NavigatorHandle { mailbox, snapshots }, task)
}

async fn run<F, B>(
    mut model: Model<F>,
    backend: Arc<B>,
    mut inbox: mpsc::Receiver<Msg>,
    mailbox: mpsc::WeakSender<Msg>,
    publisher: watch::Sender<Snapshot>,
) where
    F: PositionFeed,
    B: Backend,
{
    tracing::info!("navigator started");

    while let Some(msg) = inbox.recv().await {
        let commands = update(msg, &mut model);
        if !commands.is_empty() {
            match mailbox.upgrade() {
                Some(reply) => {
                    for command in commands {
                        tokio::spawn(execute(command, Arc::clone(&backend), reply.clone()));
                    }
                }
                None => {
                    tracing::debug!(count = commands.len(), "no handles left, dropping commands");
                    for command in &commands {
                        model.abandon(command);
                    }
                }
            }
        }
        publisher.send_replace(model.snapshot());
    }

    model.session.stop();
    publisher.send_replace(model.snapshot());
    tracing::info!("navigator stopped");
}

async fn execute<B: Backend>(command: Command, backend: Arc<B>, reply: mpsc::Sender<Msg>) {
    let msg = match command {
        Command::FetchRoute {
            origin,
            destination,
        } => Msg::RouteFetched(backend.request_route(&origin, &destination).await),
        Command::FetchRescue { observer } => {
            Msg::RescueFetched(backend.request_nearest_safe_place(observer).await)
        }
        Command::QueryRisk { location } => Msg::RiskFetched {
            location,
            result: backend.query_risk(location).await,
        },
    };

    if reply.send(msg).await.is_err() {
        tracing::debug!("navigator gone before provider result arrived");
    }
}
