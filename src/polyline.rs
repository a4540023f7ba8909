//! Line geometry: the drawn route of a match and straight replay paths.
//!
//! There is no road snapping here. A route is drawn as the segment between
//! its two anchors, oriented toward where the vehicle is heading.

use serde::{Deserialize, Serialize};

use crate::gazetteer::Anchor;
use crate::geo::GeoPoint;
use crate::model::{Direction, Route};
use crate::route_matcher::{RiderIntent, names_place};

/// An ordered sequence of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    /// Creates a polyline from points in travel order.
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// `segments + 1` evenly spaced points from `from` to `to`, inclusive.
    pub fn straight(from: GeoPoint, to: GeoPoint, segments: usize) -> Self {
        let segments = segments.max(1);
        let points = (0..=segments)
            .map(|step| {
                let t = step as f64 / segments as f64;
                GeoPoint::new(
                    from.lat + (to.lat - from.lat) * t,
                    from.lon + (to.lon - from.lon) * t,
                )
            })
            .collect();
        Self { points }
    }

    /// Returns a reference to the points.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Consumes the polyline and returns the owned points.
    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }
}

/// Endpoints of the drawn route line, origin first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteLine {
    pub origin: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
}

impl RouteLine {
    /// Orients the route so its destination is where the vehicle heads.
    ///
    /// With no known direction the rider's arrive text decides; failing
    /// that the line runs v1 to v2.
    pub fn oriented(
        route: &Route,
        v1: Option<&Anchor>,
        v2: Option<&Anchor>,
        direction: &Direction,
        intent: &RiderIntent,
    ) -> Self {
        let v1_point = v1.map(|anchor| anchor.point);
        let v2_point = v2.map(|anchor| anchor.point);
        let toward_v1 = Self {
            origin: v2_point,
            destination: v1_point,
        };
        let toward_v2 = Self {
            origin: v1_point,
            destination: v2_point,
        };

        if let Some(heading) = direction.label() {
            if heading == route.v1.label {
                return toward_v1;
            }
            if heading == route.v2.label {
                return toward_v2;
            }
        }

        match intent.arrive() {
            Some(arrive) if names_place(arrive, &route.v2.label) => toward_v2,
            Some(arrive) if names_place(arrive, &route.v1.label) => toward_v1,
            _ => toward_v2,
        }
    }

    pub fn to_polyline(&self) -> Option<Polyline> {
        Some(Polyline::new(vec![self.origin?, self.destination?]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RouteEndpoint;

    fn fixture() -> (Route, Anchor, Anchor) {
        let route = Route::new(RouteEndpoint::new("Tizi Ouzou"), RouteEndpoint::new("Alger"));
        let v1 = Anchor {
            label: "tizi ouzou".into(),
            point: GeoPoint::new(36.7118, 4.0505),
        };
        let v2 = Anchor {
            label: "alger".into(),
            point: GeoPoint::new(36.7528, 3.0420),
        };
        (route, v1, v2)
    }

    #[test]
    fn test_straight_includes_both_ends() {
        let from = GeoPoint::new(0.0, 0.0);
        let to = GeoPoint::new(1.0, 2.0);
        let line = Polyline::straight(from, to, 4);
        assert_eq!(line.points().len(), 5);
        assert_eq!(line.points()[0], from);
        assert_eq!(line.points()[4], to);
        assert_eq!(line.points()[2], GeoPoint::new(0.5, 1.0));
    }

    #[test]
    fn test_zero_segments_still_spans() {
        let line = Polyline::straight(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0), 0);
        assert_eq!(line.into_points().len(), 2);
    }

    #[test]
    fn test_heading_to_v1_flips_line() {
        let (route, v1, v2) = fixture();
        let direction = Direction::Toward("tizi ouzou".into());
        let line = RouteLine::oriented(&route, Some(&v1), Some(&v2), &direction, &RiderIntent::default());
        assert_eq!(line.destination, Some(v1.point));
        assert_eq!(line.origin, Some(v2.point));
    }

    #[test]
    fn test_heading_to_v2() {
        let (route, v1, v2) = fixture();
        let direction = Direction::Toward("alger".into());
        let line = RouteLine::oriented(&route, Some(&v1), Some(&v2), &direction, &RiderIntent::default());
        assert_eq!(line.destination, Some(v2.point));
    }

    #[test]
    fn test_unknown_direction_uses_rider_text() {
        let (route, v1, v2) = fixture();
        let intent = RiderIntent::new(None, Some("tizi"));
        let line = RouteLine::oriented(&route, Some(&v1), Some(&v2), &Direction::Unknown, &intent);
        assert_eq!(line.destination, Some(v1.point));
    }

    #[test]
    fn test_unresolved_anchor_has_no_polyline() {
        let (route, v1, _) = fixture();
        let line = RouteLine::oriented(&route, Some(&v1), None, &Direction::Unknown, &RiderIntent::default());
        assert_eq!(line.origin, Some(v1.point));
        assert!(line.destination.is_none());
        assert!(line.to_polyline().is_none());
    }
}
