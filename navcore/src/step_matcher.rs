use crate::geo::distance_meters;
use crate::models::{Coordinate, RouteStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot match a position against a route with no steps")]
pub struct EmptyRouteError;

/// Index of the step whose start is nearest to `observer`.
///
/// Ties go to the lowest index.
pub fn current_step(observer: Coordinate, steps: &[RouteStep]) -> Result<usize, EmptyRouteError> {
    nearest_step(observer, steps).map(|(index, _)| index)
}

/// Like [`current_step`], also returning the distance in meters to that
/// step's start.
pub fn nearest_step(
    observer: Coordinate,
    steps: &[RouteStep],
) -> Result<(usize, f64), EmptyRouteError> {
    let mut best: Option<(usize, f64)> = None;

    for (index, step) in steps.iter().enumerate() {
        let distance = distance_meters(observer, step.start);
        let closer = best.map_or(true, |(_, best_distance)| distance < best_distance);
        if closer {
            best = Some((index, distance));
        }
    }

    best.ok_or(EmptyRouteError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ManeuverKind;

    fn step(lat: f64, lon: f64) -> RouteStep {
        RouteStep {
            start: Coordinate { lat, lon },
            instruction: format!("continue at {lat},{lon}"),
            maneuver: ManeuverKind::Straight,
            distance_label: String::new(),
            duration_label: String::new(),
        }
    }

    #[test]
    fn picks_nearest_step_start() {
        let steps = [step(40.0, -74.0), step(40.1, -74.0), step(40.2, -74.0)];
        let observer = Coordinate { lat: 40.09, lon: -74.0 };
        assert_eq!(current_step(observer, &steps), Ok(1));
    }

    #[test]
    fn identical_starts_resolve_to_lowest_index() {
        let steps = [step(41.0, -75.0), step(40.5, -74.5), step(40.5, -74.5)];
        let observer = Coordinate { lat: 40.5, lon: -74.5 };
        assert_eq!(current_step(observer, &steps), Ok(1));
    }

    #[test]
    fn empty_route_is_an_error() {
        let observer = Coordinate { lat: 40.0, lon: -74.0 };
        assert_eq!(current_step(observer, &[]), Err(EmptyRouteError));
    }

    #[test]
    fn reports_distance_to_matched_step() {
        let steps = [step(40.0, -74.0)];
        let observer = Coordinate { lat: 40.0, lon: -74.0 };
        assert_eq!(nearest_step(observer, &steps), Ok((0, 0.0)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn nearby_coord() -> impl Strategy<Value = Coordinate> {
            (39.0..41.0, -75.0..-73.0).prop_map(|(lat, lon)| Coordinate { lat, lon })
        }

        proptest! {
            #[test]
            fn prop_match_is_a_minimum(
                observer in nearby_coord(),
                starts in prop::collection::vec(nearby_coord(), 1..20)
            ) {
                let steps: Vec<RouteStep> = starts.iter().map(|c| step(c.lat, c.lon)).collect();
                let index = current_step(observer, &steps).unwrap();
                let best = distance_meters(observer, steps[index].start);
                for (i, s) in steps.iter().enumerate() {
                    let d = distance_meters(observer, s.start);
                    prop_assert!(best <= d);
                    if i < index {
                        prop_assert!(best < d);
                    }
                }
            }
        }
    }
}
