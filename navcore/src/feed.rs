//! Position feed subscriptions.
//!
//! The platform location service is modelled as a feed that can be
//! subscribed to and unsubscribed from. Fixes themselves are delivered to
//! the session as [`crate::app::Msg::Position`] (or directly through
//! [`crate::session::NavigationSession::on_position`]).

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position feed unavailable: {0}")]
    Unavailable(String),
}

pub trait PositionFeed: Send {
    fn subscribe(&mut self) -> Result<SubscriptionId, FeedError>;

    /// Must tolerate ids that are no longer active.
    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// In-memory feed that only records subscription bookkeeping. Fixes are
/// pushed by whoever owns the session (replays, tests).
#[derive(Debug, Default)]
pub struct ManualFeed {
    active: Option<SubscriptionId>,
    next_id: u64,
    subscribe_calls: usize,
    unsubscribe_calls: usize,
}

impl ManualFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.unsubscribe_calls
    }
}

impl PositionFeed for ManualFeed {
    fn subscribe(&mut self) -> Result<SubscriptionId, FeedError> {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.active = Some(id);
        self.subscribe_calls += 1;
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        if self.active == Some(id) {
            self.active = None;
        }
        self.unsubscribe_calls += 1;
    }
}

/// Feed that publishes whether a subscription is live over a `watch`
/// channel, so a platform adapter knows when to pump fixes into the
/// navigator.
#[derive(Debug)]
pub struct SignalFeed {
    state: watch::Sender<Option<SubscriptionId>>,
    next_id: u64,
}

impl SignalFeed {
    pub fn new() -> (Self, watch::Receiver<Option<SubscriptionId>>) {
        let (state, receiver) = watch::channel(None);
        (Self { state, next_id: 0 }, receiver)
    }
}

impl PositionFeed for SignalFeed {
    fn subscribe(&mut self) -> Result<SubscriptionId, FeedError> {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.state.send_replace(Some(id));
        tracing::debug!(?id, "position feed subscribed");
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        let released = self.state.send_if_modified(|current| {
            if *current == Some(id) {
                *current = None;
                true
            } else {
                false
            }
        });
        if released {
            tracing::debug!(?id, "position feed released");
        }
    }
}
