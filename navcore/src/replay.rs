//! Offline replay of a recorded GPS trace against a route.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::NavError;
use crate::feed::ManualFeed;
use crate::geo::{distance_meters, path_length_meters};
use crate::models::{Coordinate, RouteDescriptor, SafePlace};
use crate::risk::RouteRiskSummary;
use crate::session::{NavigationSession, SessionError};

#[derive(Debug, Clone, Serialize)]
pub struct ReplayFix {
    pub position: Coordinate,
    pub step_index: Option<usize>,
    pub instruction: Option<String>,
    /// Distance to the current step's start, or to the safe place on a
    /// rescue route.
    pub distance_m: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub path_points: usize,
    pub path_length_m: f64,
    pub risk: RouteRiskSummary,
    pub rescue_destination: Option<SafePlace>,
    pub fixes: Vec<ReplayFix>,
}

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, NavError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Drive a fresh session through `trace`. Standard routes are navigated
/// step by step; rescue routes only report the distance left to the safe
/// place.
pub fn replay(route: RouteDescriptor, trace: &[Coordinate]) -> Result<ReplayReport, SessionError> {
    let risk = RouteRiskSummary::from_samples(route.route_risk_samples());
    let rescue_destination = match &route {
        RouteDescriptor::Rescue { destination, .. } => Some(destination.clone()),
        RouteDescriptor::Standard { .. } => None,
    };

    let mut session = NavigationSession::new(ManualFeed::new());
    session.load_route(route)?;

    let fixes = match &rescue_destination {
        Some(place) => trace
            .iter()
            .map(|&position| ReplayFix {
                position,
                step_index: None,
                instruction: None,
                distance_m: distance_meters(position, place.coordinate),
            })
            .collect(),
        None => {
            session.start()?;
            let mut fixes = Vec::with_capacity(trace.len());
            for &position in trace {
                let step_index = session.on_position(position);
                let step = session.current_step();
                fixes.push(ReplayFix {
                    position,
                    step_index,
                    instruction: step.map(|s| s.instruction.clone()),
                    distance_m: step.map_or(0.0, |s| distance_meters(position, s.start)),
                });
            }
            session.stop();
            fixes
        }
    };

    Ok(ReplayReport {
        path_points: session.decoded_path().len(),
        path_length_m: path_length_meters(session.decoded_path()),
        risk,
        rescue_destination,
        fixes,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::models::{ManeuverKind, RiskLevel, RiskSample, RouteStep};
    use crate::polyline::encode_path;

    fn route() -> RouteDescriptor {
        let starts = [
            Coordinate { lat: 40.0, lon: -74.0 },
            Coordinate { lat: 40.1, lon: -74.0 },
            Coordinate { lat: 40.2, lon: -74.0 },
        ];
        RouteDescriptor::Standard {
            encoded_path: encode_path(&starts),
            steps: starts
                .iter()
                .map(|start| RouteStep {
                    start: *start,
                    instruction: format!("Continue past {:.1}", start.lat),
                    maneuver: ManeuverKind::Straight,
                    distance_label: String::new(),
                    duration_label: String::new(),
                })
                .collect(),
            alternate_encoded_path: None,
            route_risk_samples: vec![RiskSample::new(starts[1], 58.0, "Ponding reported", false)],
        }
    }

    #[test]
    fn replays_standard_route() {
        let trace = [
            Coordinate { lat: 40.01, lon: -74.0 },
            Coordinate { lat: 40.09, lon: -74.0 },
            Coordinate { lat: 40.21, lon: -74.0 },
        ];
        let report = replay(route(), &trace).unwrap();

        let indices: Vec<Option<usize>> = report.fixes.iter().map(|f| f.step_index).collect();
        assert_eq!(indices, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(report.fixes[1].instruction.as_deref(), Some("Continue past 40.1"));
        assert!(report.fixes[1].distance_m > 1_000.0 && report.fixes[1].distance_m < 1_200.0);
        assert_eq!(report.path_points, 3);
        assert!(report.path_length_m > 22_000.0);
        assert_eq!(report.risk.level, RiskLevel::High);
    }

    #[test]
    fn replays_rescue_route_as_distance_to_safe_place() {
        let route = RouteDescriptor::Rescue {
            encoded_path: "_p~iF~ps|U".into(),
            destination: SafePlace {
                coordinate: Coordinate { lat: 38.5, lon: -120.2 },
                label: "Shelter".into(),
                category: "Emergency Shelter".into(),
            },
        };
        let report = replay(route, &[Coordinate { lat: 38.5, lon: -120.2 }]).unwrap();
        assert_eq!(report.fixes[0].step_index, None);
        assert_eq!(report.fixes[0].distance_m, 0.0);
        assert!(report.rescue_destination.is_some());
    }

    #[test]
    fn reads_route_and_trace_files() {
        let dir = tempfile::tempdir().unwrap();
        let route_path = dir.path().join("route.json");
        let trace_path = dir.path().join("trace.json");

        let mut file = File::create(&route_path).unwrap();
        file.write_all(serde_json::to_string(&route()).unwrap().as_bytes())
            .unwrap();
        std::fs::write(&trace_path, r#"[{"lat": 40.19, "lng": -74.0}]"#).unwrap();

        let route: RouteDescriptor = read_json(&route_path).unwrap();
        let trace: Vec<Coordinate> = read_json(&trace_path).unwrap();
        let report = replay(route, &trace).unwrap();
        assert_eq!(report.fixes[0].step_index, Some(2));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json::<Vec<Coordinate>>(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, NavError::Io(_)));
    }
}
