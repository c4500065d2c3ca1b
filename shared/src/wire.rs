//! JSON bodies exchanged with the flood-navigation backend.

use serde::{Deserialize, Serialize};

use crate::{Coordinate, ManeuverKind, RiskSample, RouteDescriptor, RouteStep, SafePlace};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    #[serde(default = "default_avoid_flood")]
    pub avoid_flood: bool,
}

pub fn default_avoid_flood() -> bool {
    true
}

/// Plain latitude/longitude body used by the risk and safe-zone endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointRequest {
    pub lat: f64,
    pub lng: f64,
}

impl From<Coordinate> for PointRequest {
    fn from(coord: Coordinate) -> Self {
        Self {
            lat: coord.lat,
            lng: coord.lon,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavStep {
    pub instruction: String,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub maneuver: Option<String>,
    pub start_lat: f64,
    pub start_lng: f64,
}

impl From<NavStep> for RouteStep {
    fn from(step: NavStep) -> Self {
        RouteStep {
            start: Coordinate::new(step.start_lat, step.start_lng),
            maneuver: ManeuverKind::from_provider_tag(step.maneuver.as_deref()),
            instruction: step.instruction,
            distance_label: step.distance,
            duration_label: step.duration,
        }
    }
}

/// Risk reading along a computed route. The backend's own `risk_level`
/// string is ignored; levels are re-derived from the score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRiskPoint {
    pub lat: f64,
    pub lng: f64,
    pub risk_score: f64,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub is_flood_zone: bool,
}

impl From<RouteRiskPoint> for RiskSample {
    fn from(point: RouteRiskPoint) -> Self {
        RiskSample::new(
            Coordinate::new(point.lat, point.lng),
            point.risk_score,
            point.label,
            point.is_flood_zone,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloodWarning {
    pub location: String,
    pub risk_score: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeRoute {
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub duration: String,
    pub polyline: String,
    #[serde(default)]
    pub overall_risk: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub duration: String,
    pub polyline: String,
    #[serde(default)]
    pub flood_warnings: Vec<FloodWarning>,
    #[serde(default)]
    pub overall_risk: f64,
    #[serde(default)]
    pub alternative_route: Option<AlternativeRoute>,
    #[serde(default)]
    pub steps: Vec<NavStep>,
    #[serde(default)]
    pub route_risk_points: Vec<RouteRiskPoint>,
}

impl From<RouteResponse> for RouteDescriptor {
    fn from(response: RouteResponse) -> Self {
        RouteDescriptor::Standard {
            encoded_path: response.polyline,
            steps: response.steps.into_iter().map(RouteStep::from).collect(),
            alternate_encoded_path: response.alternative_route.map(|alt| alt.polyline),
            route_risk_samples: response
                .route_risk_points
                .into_iter()
                .map(RiskSample::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloodRiskResponse {
    pub lat: f64,
    pub lng: f64,
    pub risk_score: f64,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub is_flood_zone: bool,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub data_sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafePlaceResult {
    pub place_name: String,
    pub place_type: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub polyline: String,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub duration: String,
}

impl From<SafePlaceResult> for RouteDescriptor {
    fn from(place: SafePlaceResult) -> Self {
        RouteDescriptor::Rescue {
            encoded_path: place.polyline,
            destination: SafePlace {
                coordinate: Coordinate::new(place.lat, place.lng),
                label: place.place_name,
                category: place.place_type,
            },
        }
    }
}

/// Safe places ordered nearest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeZoneResponse {
    #[serde(default)]
    pub user_location: String,
    #[serde(default)]
    pub results: Vec<SafePlaceResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,
}
