pub mod risk;
pub mod wire;

use serde::{Deserialize, Serialize};

pub use risk::{RiskLevel, RiskSample};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverKind {
    #[default]
    Straight,
    Left,
    Right,
    UturnOrRoundabout,
}

impl ManeuverKind {
    /// Maps a routing provider maneuver tag (`turn-left`, `uturn-right`,
    /// `roundabout-left`, `ramp-right`, ...) onto the four guidance icons.
    pub fn from_provider_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag.map(str::trim).filter(|t| !t.is_empty()) else {
            return Self::Straight;
        };
        let tag = tag.to_ascii_lowercase();
        if tag.starts_with("uturn") || tag.starts_with("roundabout") {
            Self::UturnOrRoundabout
        } else if tag.ends_with("left") {
            Self::Left
        } else if tag.ends_with("right") {
            Self::Right
        } else {
            Self::Straight
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub start: Coordinate,
    pub instruction: String,
    #[serde(default)]
    pub maneuver: ManeuverKind,
    #[serde(default)]
    pub distance_label: String,
    #[serde(default)]
    pub duration_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafePlace {
    pub coordinate: Coordinate,
    pub label: String,
    pub category: String,
}

/// A route as handed over by the routing backend.
///
/// `Standard` routes carry turn-by-turn steps and can be navigated;
/// `Rescue` routes only point at a single safe place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteDescriptor {
    Standard {
        encoded_path: String,
        steps: Vec<RouteStep>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alternate_encoded_path: Option<String>,
        #[serde(default)]
        route_risk_samples: Vec<RiskSample>,
    },
    Rescue {
        encoded_path: String,
        destination: SafePlace,
    },
}

impl RouteDescriptor {
    pub fn encoded_path(&self) -> &str {
        match self {
            Self::Standard { encoded_path, .. } | Self::Rescue { encoded_path, .. } => encoded_path,
        }
    }

    pub fn alternate_encoded_path(&self) -> Option<&str> {
        match self {
            Self::Standard {
                alternate_encoded_path,
                ..
            } => alternate_encoded_path.as_deref(),
            Self::Rescue { .. } => None,
        }
    }

    /// Guidance steps; always empty for rescue routes.
    pub fn steps(&self) -> &[RouteStep] {
        match self {
            Self::Standard { steps, .. } => steps,
            Self::Rescue { .. } => &[],
        }
    }

    pub fn route_risk_samples(&self) -> &[RiskSample] {
        match self {
            Self::Standard {
                route_risk_samples, ..
            } => route_risk_samples,
            Self::Rescue { .. } => &[],
        }
    }

    pub fn is_rescue(&self) -> bool {
        matches!(self, Self::Rescue { .. })
    }
}
