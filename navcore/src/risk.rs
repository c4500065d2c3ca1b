//! Risk policy entry point for the engine.
//!
//! The banding itself lives in [`shared::risk`] so that every consumer of
//! the data model classifies the same way; this module adds the route-level
//! aggregation used for summaries and alerts.

use serde::Serialize;

pub use shared::risk::{classify, RiskLevel, RiskSample, HIGH_MAX, LOW_MAX, MAX_SCORE, MODERATE_MAX};

/// Worst-case view of the risk readings taken along a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRiskSummary {
    pub overall_score: f64,
    pub level: RiskLevel,
    /// Samples above the low band, in route order.
    pub warnings: Vec<RiskSample>,
}

impl RouteRiskSummary {
    pub fn from_samples(samples: &[RiskSample]) -> Self {
        let overall_score = samples
            .iter()
            .map(RiskSample::score)
            .filter(|score| !score.is_nan())
            .fold(0.0_f64, f64::max);

        Self {
            overall_score,
            level: classify(overall_score),
            warnings: samples
                .iter()
                .filter(|sample| sample.level() > RiskLevel::Low)
                .cloned()
                .collect(),
        }
    }

    pub fn is_clear(&self) -> bool {
        self.warnings.is_empty()
    }
}

impl Default for RouteRiskSummary {
    fn default() -> Self {
        Self::from_samples(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    fn sample(score: f64) -> RiskSample {
        RiskSample::new(Coordinate { lat: 40.0, lon: -74.0 }, score, "", false)
    }

    #[test]
    fn empty_route_is_low_risk() {
        let summary = RouteRiskSummary::from_samples(&[]);
        assert_eq!(summary.overall_score, 0.0);
        assert_eq!(summary.level, RiskLevel::Low);
        assert!(summary.is_clear());
    }

    #[test]
    fn overall_score_is_worst_sample() {
        let samples = [sample(12.0), sample(47.5), sample(33.0)];
        let summary = RouteRiskSummary::from_samples(&samples);
        assert_eq!(summary.overall_score, 47.5);
        assert_eq!(summary.level, RiskLevel::High);
    }

    #[test]
    fn warnings_skip_low_samples_and_keep_order() {
        let samples = [sample(20.0), sample(61.0), sample(5.0), sample(21.0)];
        let summary = RouteRiskSummary::from_samples(&samples);
        let scores: Vec<f64> = summary.warnings.iter().map(RiskSample::score).collect();
        assert_eq!(scores, vec![61.0, 21.0]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_classify_is_monotonic(a in proptest::num::f64::ANY, b in proptest::num::f64::ANY) {
                prop_assume!(!a.is_nan() && !b.is_nan());
                let (low, high) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(classify(low) <= classify(high));
            }

            #[test]
            fn prop_classify_matches_band_bounds(score in -100.0..200.0_f64) {
                let level = classify(score);
                let expected = if score <= LOW_MAX {
                    RiskLevel::Low
                } else if score <= MODERATE_MAX {
                    RiskLevel::Moderate
                } else if score <= HIGH_MAX {
                    RiskLevel::High
                } else {
                    RiskLevel::Severe
                };
                prop_assert_eq!(level, expected);
            }
        }
    }
}
