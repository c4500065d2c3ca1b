//! Event-driven controller.
//!
//! Everything the outside world does (a route arrives, the user taps the
//! map, a GPS fix comes in) is a [`Msg`]. [`update`] applies it to the
//! [`Model`] and returns the asynchronous [`Command`]s that should run as a
//! result. The controller itself never performs I/O and holds no UI state.

use serde::Serialize;

use crate::feed::PositionFeed;
use crate::models::{Coordinate, RouteDescriptor};
use crate::overlay::{OverlaySnapshot, RiskOverlayStore, SampleRef};
use crate::provider::{ProviderError, RiskAssessment};
use crate::session::{NavigationSession, SessionError, SessionSnapshot};

#[derive(Debug)]
pub enum Msg {
    RequestRoute { origin: String, destination: String },
    RouteFetched(Result<RouteDescriptor, ProviderError>),
    RequestRescue { observer: Coordinate },
    RescueFetched(Result<RouteDescriptor, ProviderError>),
    StartNavigation,
    StopNavigation,
    Position(Coordinate),
    MapTapped(Coordinate),
    RiskFetched {
        location: Coordinate,
        result: Result<RiskAssessment, ProviderError>,
    },
    SelectSample(SampleRef),
    DeselectSample,
    ClearSamples,
    DismissStatus,
}

/// Work for the runtime to carry out; each result comes back as a [`Msg`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchRoute { origin: String, destination: String },
    FetchRescue { observer: Coordinate },
    QueryRisk { location: Coordinate },
}

/// User-facing status line. Everything here is retryable or informational.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Status {
    RouteUnavailable(String),
    NoSafePlaceFound,
    InvalidRoute(String),
    PositionUnavailable(String),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub session: SessionSnapshot,
    pub overlay: OverlaySnapshot,
    pub status: Option<Status>,
    pub route_pending: bool,
    pub risk_queries_pending: usize,
}

pub struct Model<F: PositionFeed> {
    pub session: NavigationSession<F>,
    pub overlay: RiskOverlayStore,
    route_pending: bool,
    risk_queries_pending: usize,
    status: Option<Status>,
}

impl<F: PositionFeed> Model<F> {
    pub fn new(feed: F) -> Self {
        Self {
            session: NavigationSession::new(feed),
            overlay: RiskOverlayStore::new(),
            route_pending: false,
            risk_queries_pending: 0,
            status: None,
        }
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn route_pending(&self) -> bool {
        self.route_pending
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session: self.session.snapshot(),
            overlay: self.overlay.snapshot(),
            status: self.status.clone(),
            route_pending: self.route_pending,
            risk_queries_pending: self.risk_queries_pending,
        }
    }

    /// Undo the pending bookkeeping for a command that will never run.
    pub(crate) fn abandon(&mut self, command: &Command) {
        match command {
            Command::FetchRoute { .. } | Command::FetchRescue { .. } => self.route_pending = false,
            Command::QueryRisk { .. } => {
                self.risk_queries_pending = self.risk_queries_pending.saturating_sub(1);
            }
        }
    }

    fn apply_route(&mut self, route: RouteDescriptor) {
        let samples = route.route_risk_samples().to_vec();
        match self.session.load_route(route) {
            Ok(()) => {
                self.overlay.set_route_samples(samples);
                self.status = None;
            }
            Err(err) => {
                tracing::error!("discarding route: {err}");
                self.overlay.set_route_samples(Vec::new());
                self.status = Some(Status::InvalidRoute(err.to_string()));
            }
        }
    }
}

pub fn update<F: PositionFeed>(msg: Msg, model: &mut Model<F>) -> Vec<Command> {
    match msg {
        Msg::RequestRoute {
            origin,
            destination,
        } => {
            let (origin, destination) = (origin.trim(), destination.trim());
            if model.route_pending || origin.is_empty() || destination.is_empty() {
                return Vec::new();
            }
            model.route_pending = true;
            model.status = None;
            vec![Command::FetchRoute {
                origin: origin.to_string(),
                destination: destination.to_string(),
            }]
        }
        Msg::RequestRescue { observer } => {
            if model.route_pending {
                return Vec::new();
            }
            model.route_pending = true;
            model.status = None;
            vec![Command::FetchRescue { observer }]
        }
        Msg::RouteFetched(result) => {
            model.route_pending = false;
            match result {
                Ok(route) => model.apply_route(route),
                Err(err) => {
                    tracing::warn!("route request failed: {err}");
                    model.status = Some(Status::RouteUnavailable(err.to_string()));
                }
            }
            Vec::new()
        }
        Msg::RescueFetched(result) => {
            model.route_pending = false;
            match result {
                Ok(route) => model.apply_route(route),
                Err(err) => {
                    tracing::warn!("rescue route request failed: {err}");
                    model.status = Some(Status::NoSafePlaceFound);
                }
            }
            Vec::new()
        }
        Msg::StartNavigation => {
            match model.session.start() {
                Ok(()) => {}
                Err(SessionError::Feed(err)) => {
                    model.status = Some(Status::PositionUnavailable(err.to_string()));
                }
                Err(err) => tracing::warn!("cannot start navigation: {err}"),
            }
            Vec::new()
        }
        Msg::StopNavigation => {
            model.session.stop();
            Vec::new()
        }
        Msg::Position(position) => {
            if !position.is_valid() {
                tracing::warn!(?position, "ignoring fix outside coordinate range");
                return Vec::new();
            }
            model.session.on_position(position);
            Vec::new()
        }
        Msg::MapTapped(location) => {
            if !location.is_valid() {
                tracing::warn!(?location, "ignoring tap outside coordinate range");
                return Vec::new();
            }
            if model.session.is_navigating() {
                tracing::debug!("risk sampling suppressed while navigating");
                return Vec::new();
            }
            model.risk_queries_pending += 1;
            vec![Command::QueryRisk { location }]
        }
        Msg::RiskFetched { location, result } => {
            model.risk_queries_pending = model.risk_queries_pending.saturating_sub(1);
            if model.session.is_navigating() {
                tracing::debug!(?location, "risk result arrived while navigating, dropped");
                return Vec::new();
            }
            match result {
                Ok(assessment) => {
                    model.overlay.add_sample(
                        location,
                        assessment.score,
                        assessment.recommendation,
                        assessment.known_flood_zone,
                    );
                }
                Err(err) => tracing::debug!("dropping risk sample: {err}"),
            }
            Vec::new()
        }
        Msg::SelectSample(sample) => {
            model.overlay.select(sample);
            Vec::new()
        }
        Msg::DeselectSample => {
            model.overlay.deselect();
            Vec::new()
        }
        Msg::ClearSamples => {
            model.overlay.clear();
            Vec::new()
        }
        Msg::DismissStatus => {
            model.status = None;
            Vec::new()
        }
    }
}
