//! HTTP adapter for the flood-navigation backend.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::wire::{
    ApiError, FloodRiskResponse, PointRequest, RouteRequest, RouteResponse, SafeZoneResponse,
};

use crate::config::{ClientConfig, ConfigError};
use crate::models::{Coordinate, RouteDescriptor};
use crate::provider::{
    ProviderError, RescueRouteProvider, RiskAssessment, RiskQueryService, RouteProvider,
};

const ROUTE_PATH: &str = "navigation/route";
const SAFE_ZONE_PATH: &str = "navigation/safezone";
const RISK_PATH: &str = "flood/risk";

#[derive(Debug, thiserror::Error)]
enum CallError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },
}

#[derive(Clone)]
pub struct HttpBackend {
    config: ClientConfig,
    client: Client,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let request = self.client.post(self.config.endpoint(path));
        match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn call<B, T>(&self, path: &str, body: &B) -> Result<T, CallError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(path, "backend request");
        let response = self.post(path).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ApiError>().await {
                Ok(err) => err.detail,
                Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
            };
            return Err(CallError::Status { status, detail });
        }
        Ok(response.json::<T>().await?)
    }
}

impl RouteProvider for HttpBackend {
    async fn request_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<RouteDescriptor, ProviderError> {
        let body = RouteRequest {
            origin: origin.to_string(),
            destination: destination.to_string(),
            avoid_flood: true,
        };
        let response: RouteResponse = self
            .call(ROUTE_PATH, &body)
            .await
            .map_err(|err| ProviderError::RouteUnavailable(err.to_string()))?;
        tracing::info!(
            steps = response.steps.len(),
            risk_points = response.route_risk_points.len(),
            "route received"
        );
        Ok(RouteDescriptor::from(response))
    }
}

impl RescueRouteProvider for HttpBackend {
    async fn request_nearest_safe_place(
        &self,
        observer: Coordinate,
    ) -> Result<RouteDescriptor, ProviderError> {
        let response: SafeZoneResponse = self
            .call(SAFE_ZONE_PATH, &PointRequest::from(observer))
            .await
            .map_err(|err| {
                tracing::warn!("safe zone lookup failed: {err}");
                ProviderError::NoSafePlaceFound
            })?;
        response
            .results
            .into_iter()
            .next()
            .map(RouteDescriptor::from)
            .ok_or(ProviderError::NoSafePlaceFound)
    }
}

impl RiskQueryService for HttpBackend {
    async fn query_risk(&self, location: Coordinate) -> Result<RiskAssessment, ProviderError> {
        let response: FloodRiskResponse = self
            .call(RISK_PATH, &PointRequest::from(location))
            .await
            .map_err(|err| ProviderError::RiskQuery(err.to_string()))?;
        Ok(RiskAssessment {
            score: response.risk_score,
            recommendation: response.recommendation,
            known_flood_zone: response.is_flood_zone,
        })
    }
}
