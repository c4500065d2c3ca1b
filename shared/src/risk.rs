//! Flood risk vocabulary.
//!
//! Scores come from the backend on a 0..=80 scale. The banding below is the
//! only place thresholds are defined; overlay markers, route summaries and
//! warnings all go through [`classify`].

use serde::{Deserialize, Serialize};

use crate::Coordinate;

pub const MAX_SCORE: f64 = 80.0;
pub const LOW_MAX: f64 = 20.0;
pub const MODERATE_MAX: f64 = 40.0;
pub const HIGH_MAX: f64 = 60.0;

/// Severity tiers, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Severe => "severe",
        }
    }
}

/// Half-open ascending bands: `<= 20` low, `<= 40` moderate, `<= 60` high,
/// anything above severe. Total over `f64`; NaN is treated as low.
pub fn classify(score: f64) -> RiskLevel {
    if score.is_nan() || score <= LOW_MAX {
        RiskLevel::Low
    } else if score <= MODERATE_MAX {
        RiskLevel::Moderate
    } else if score <= HIGH_MAX {
        RiskLevel::High
    } else {
        RiskLevel::Severe
    }
}

/// A point flood-risk reading. The level is always derived from the score,
/// including when a sample is deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RiskSampleRecord")]
pub struct RiskSample {
    location: Coordinate,
    score: f64,
    level: RiskLevel,
    recommendation: String,
    known_flood_zone: bool,
}

impl RiskSample {
    pub fn new(
        location: Coordinate,
        score: f64,
        recommendation: impl Into<String>,
        known_flood_zone: bool,
    ) -> Self {
        Self {
            location,
            score,
            level: classify(score),
            recommendation: recommendation.into(),
            known_flood_zone,
        }
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    /// Raw backend score, unclamped.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Score clamped to the 0..=80 display scale.
    pub fn display_score(&self) -> f64 {
        if self.score.is_nan() {
            0.0
        } else {
            self.score.clamp(0.0, MAX_SCORE)
        }
    }

    pub fn level(&self) -> RiskLevel {
        self.level
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    pub fn is_known_flood_zone(&self) -> bool {
        self.known_flood_zone
    }
}

#[derive(Deserialize)]
struct RiskSampleRecord {
    location: Coordinate,
    score: f64,
    #[serde(default)]
    recommendation: String,
    #[serde(default)]
    known_flood_zone: bool,
}

impl From<RiskSampleRecord> for RiskSample {
    fn from(record: RiskSampleRecord) -> Self {
        RiskSample::new(
            record.location,
            record.score,
            record.recommendation,
            record.known_flood_zone,
        )
    }
}
