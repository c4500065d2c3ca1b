//! Boundary traits for the upstream services the engine talks to.
//!
//! Implementations are asynchronous and must be `Send` so the runtime can
//! drive them on its own tasks. See [`crate::http_client::HttpBackend`] for
//! the HTTP implementation.

use std::future::Future;

use crate::models::{Coordinate, RouteDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("route unavailable: {0}")]
    RouteUnavailable(String),
    #[error("no safe place found near the current position")]
    NoSafePlaceFound,
    #[error("risk query failed: {0}")]
    RiskQuery(String),
}

/// Backend reading for a single location.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub score: f64,
    pub recommendation: String,
    pub known_flood_zone: bool,
}

pub trait RouteProvider: Send + Sync {
    /// Standard route from `origin` to `destination` (free-form addresses).
    fn request_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> impl Future<Output = Result<RouteDescriptor, ProviderError>> + Send;
}

pub trait RescueRouteProvider: Send + Sync {
    /// Rescue route to the nearest hospital or shelter.
    fn request_nearest_safe_place(
        &self,
        observer: Coordinate,
    ) -> impl Future<Output = Result<RouteDescriptor, ProviderError>> + Send;
}

pub trait RiskQueryService: Send + Sync {
    fn query_risk(
        &self,
        location: Coordinate,
    ) -> impl Future<Output = Result<RiskAssessment, ProviderError>> + Send;
}
