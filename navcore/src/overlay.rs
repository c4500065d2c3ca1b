//! Flood risk overlay: ad-hoc samples from map taps plus the samples that
//! came with the current route.

use serde::Serialize;

use crate::models::{Coordinate, RiskSample};
use crate::risk::RouteRiskSummary;

/// Which collection a selected sample lives in, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "collection", content = "index", rename_all = "snake_case")]
pub enum SampleRef {
    AdHoc(usize),
    Route(usize),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OverlaySnapshot {
    pub samples: Vec<RiskSample>,
    pub route_samples: Vec<RiskSample>,
    pub selected: Option<RiskSample>,
    pub route_summary: RouteRiskSummary,
}

#[derive(Debug, Default)]
pub struct RiskOverlayStore {
    samples: Vec<RiskSample>,
    route_samples: Vec<RiskSample>,
    selected: Option<SampleRef>,
}

impl RiskOverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading. Repeated taps on the same spot each add a sample.
    pub fn add_sample(
        &mut self,
        location: Coordinate,
        score: f64,
        recommendation: impl Into<String>,
        known_flood_zone: bool,
    ) -> RiskSample {
        let sample = RiskSample::new(location, score, recommendation, known_flood_zone);
        tracing::debug!(
            lat = location.lat,
            lon = location.lon,
            score,
            level = sample.level().as_str(),
            "risk sample added"
        );
        self.samples.push(sample.clone());
        sample
    }

    /// Drop all ad-hoc samples. Route samples are left alone.
    pub fn clear(&mut self) {
        self.samples.clear();
        if matches!(self.selected, Some(SampleRef::AdHoc(_))) {
            self.selected = None;
        }
    }

    /// Replace the route-level samples wholesale.
    pub fn set_route_samples(&mut self, samples: Vec<RiskSample>) {
        self.route_samples = samples;
        if matches!(self.selected, Some(SampleRef::Route(_))) {
            self.selected = None;
        }
    }

    /// Select a sample for detail display, replacing any previous selection.
    /// Returns `None` and leaves the selection unchanged if `sample` does
    /// not point at an existing sample.
    pub fn select(&mut self, sample: SampleRef) -> Option<&RiskSample> {
        self.resolve(sample)?;
        self.selected = Some(sample);
        self.resolve(sample)
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&RiskSample> {
        self.selected.and_then(|sample| self.resolve(sample))
    }

    pub fn samples(&self) -> &[RiskSample] {
        &self.samples
    }

    pub fn route_samples(&self) -> &[RiskSample] {
        &self.route_samples
    }

    pub fn route_summary(&self) -> RouteRiskSummary {
        RouteRiskSummary::from_samples(&self.route_samples)
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            samples: self.samples.clone(),
            route_samples: self.route_samples.clone(),
            selected: self.selected().cloned(),
            route_summary: self.route_summary(),
        }
    }

    fn resolve(&self, sample: SampleRef) -> Option<&RiskSample> {
        match sample {
            SampleRef::AdHoc(index) => self.samples.get(index),
            SampleRef::Route(index) => self.route_samples.get(index),
        }
    }
}
