//! Live navigation state machine.
//!
//! A session is `Idle` until [`NavigationSession::start`] is called on a
//! loaded standard route, then tracks the observer against the route's
//! steps until [`NavigationSession::stop`]. The position-feed subscription
//! is held only while navigating and is released exactly once, including
//! when the session is dropped.

use std::sync::Arc;

use serde::Serialize;

use crate::feed::{FeedError, PositionFeed, SubscriptionId};
use crate::models::{Coordinate, RouteDescriptor, RouteStep};
use crate::polyline::{decode_path, DecodeError};
use crate::step_matcher::current_step;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Navigating,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no navigable route is loaded")]
    NoRoute,
    #[error("navigation is already in progress")]
    AlreadyNavigating,
    #[error("route rejected: {0}")]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// Read-only view handed to the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub route: Option<Arc<RouteDescriptor>>,
    pub decoded_path: Arc<[Coordinate]>,
    pub alternate_path: Option<Arc<[Coordinate]>>,
    /// Only set while navigating a standard route.
    pub current_step_index: Option<usize>,
    pub last_observer_position: Option<Coordinate>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            route: None,
            decoded_path: Arc::from(Vec::new()),
            alternate_path: None,
            current_step_index: None,
            last_observer_position: None,
        }
    }
}

pub struct NavigationSession<F: PositionFeed> {
    feed: F,
    subscription: Option<SubscriptionId>,
    state: SessionState,
    route: Option<Arc<RouteDescriptor>>,
    decoded_path: Arc<[Coordinate]>,
    alternate_path: Option<Arc<[Coordinate]>>,
    current_step_index: usize,
    last_observer_position: Option<Coordinate>,
}

impl<F: PositionFeed> NavigationSession<F> {
    pub fn new(feed: F) -> Self {
        Self {
            feed,
            subscription: None,
            state: SessionState::Idle,
            route: None,
            decoded_path: Arc::from(Vec::new()),
            alternate_path: None,
            current_step_index: 0,
            last_observer_position: None,
        }
    }

    /// Replace the active route. Any navigation in progress is stopped
    /// first. A route whose path does not decode is rejected and leaves the
    /// session without a route.
    pub fn load_route(&mut self, descriptor: RouteDescriptor) -> Result<(), SessionError> {
        self.stop();

        self.route = None;
        self.decoded_path = Arc::from(Vec::new());
        self.alternate_path = None;
        self.current_step_index = 0;

        let decoded = decode_path(descriptor.encoded_path())?;
        let alternate = descriptor
            .alternate_encoded_path()
            .map(decode_path)
            .transpose()?;

        tracing::info!(
            rescue = descriptor.is_rescue(),
            steps = descriptor.steps().len(),
            points = decoded.len(),
            "route loaded"
        );

        self.decoded_path = Arc::from(decoded);
        self.alternate_path = alternate.map(Arc::from);
        self.route = Some(Arc::new(descriptor));
        Ok(())
    }

    /// Begin tracking. Requires a loaded standard route with at least one
    /// step; rescue routes have nothing to step through.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Navigating {
            return Err(SessionError::AlreadyNavigating);
        }
        let navigable = self
            .route
            .as_deref()
            .is_some_and(|route| !route.is_rescue() && !route.steps().is_empty());
        if !navigable {
            return Err(SessionError::NoRoute);
        }

        let id = self.feed.subscribe()?;
        self.subscription = Some(id);
        self.state = SessionState::Navigating;
        self.current_step_index = 0;
        tracing::info!(?id, "navigation started");
        Ok(())
    }

    /// Feed one observer fix. Returns the current step index for standard
    /// routes. Fixes received while idle are ignored.
    pub fn on_position(&mut self, position: Coordinate) -> Option<usize> {
        if self.state != SessionState::Navigating {
            tracing::debug!(?position, "ignoring position while idle");
            return None;
        }
        self.last_observer_position = Some(position);

        let route = self.route.as_deref()?;
        if route.is_rescue() {
            return None;
        }

        match current_step(position, route.steps()) {
            Ok(index) => {
                if index != self.current_step_index {
                    tracing::debug!(from = self.current_step_index, to = index, "current step changed");
                }
                self.current_step_index = index;
                Some(index)
            }
            Err(err) => {
                tracing::warn!("step matching skipped: {err}");
                None
            }
        }
    }

    /// Return to idle and release the position feed. Safe to call from any
    /// state, any number of times.
    pub fn stop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.feed.unsubscribe(id);
            tracing::info!(?id, "navigation stopped");
        }
        self.state = SessionState::Idle;
        self.last_observer_position = None;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_navigating(&self) -> bool {
        self.state == SessionState::Navigating
    }

    pub fn route(&self) -> Option<&RouteDescriptor> {
        self.route.as_deref()
    }

    pub fn decoded_path(&self) -> &[Coordinate] {
        &self.decoded_path
    }

    pub fn alternate_path(&self) -> Option<&[Coordinate]> {
        self.alternate_path.as_deref()
    }

    /// Raw step index. Only meaningful while navigating a standard route;
    /// prefer [`Self::current_step`] when rendering.
    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn current_step(&self) -> Option<&RouteStep> {
        if !self.is_navigating() {
            return None;
        }
        self.route()?.steps().get(self.current_step_index)
    }

    pub fn last_observer_position(&self) -> Option<Coordinate> {
        self.last_observer_position
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            route: self.route.clone(),
            decoded_path: Arc::clone(&self.decoded_path),
            alternate_path: self.alternate_path.clone(),
            current_step_index: self.current_step().map(|_| self.current_step_index),
            last_observer_position: self.last_observer_position,
        }
    }
}

impl<F: PositionFeed> Drop for NavigationSession<F> {
    fn drop(&mut self) {
        self.stop();
    }
}
