//! Direction of travel and trip completion from a single GPS sample.

use crate::gazetteer::Anchor;
use crate::geo::{GeoPoint, distance_km};
use crate::model::Direction;

/// Default radius around the destination anchor that ends a trip.
pub const DEFAULT_ARRIVAL_RADIUS_KM: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub enum Inference {
    /// The vehicle is still on its leg, heading as given.
    Heading(Direction),
    /// The sample landed at the destination anchor; the trip is over.
    Completed,
}

/// Infers where a vehicle is heading from its position and route anchors.
///
/// A vehicle closer to the origin than to the destination is moving away
/// from the origin, so it heads to the destination. Otherwise, ties
/// included, it is heading back to the origin.
pub fn infer_direction(
    current: GeoPoint,
    origin: Option<&Anchor>,
    destination: Option<&Anchor>,
    arrival_radius_km: f64,
) -> Inference {
    let (Some(origin), Some(destination)) = (origin, destination) else {
        return Inference::Heading(Direction::Unknown);
    };
    if !current.is_valid() {
        return Inference::Heading(Direction::Unknown);
    }

    let dist_to_destination = distance_km(Some(current), Some(destination.point));
    if dist_to_destination < arrival_radius_km {
        return Inference::Completed;
    }

    let dist_to_origin = distance_km(Some(current), Some(origin.point));
    if dist_to_origin < dist_to_destination {
        Inference::Heading(Direction::Toward(destination.label.clone()))
    } else {
        Inference::Heading(Direction::Toward(origin.label.clone()))
    }
}
