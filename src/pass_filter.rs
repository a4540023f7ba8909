//! Rules out vehicles that can no longer pick a rider up on this leg.

use crate::gazetteer::{Anchor, Gazetteer};
use crate::geo::{GeoPoint, distance_km};
use crate::model::{Route, Trip};
use crate::route_matcher::{RiderIntent, names_place};

/// Default tolerance absorbing GPS noise before a vehicle counts as past.
pub const DEFAULT_PASS_MARGIN_KM: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassVerdict {
    Eligible,
    /// Heading to the other end of the route.
    WrongWay,
    /// Already closer to the rider's destination than the rider is.
    AlreadyPassed,
}

/// Finds the anchor of the place the rider wants to reach.
///
/// Prefers a route endpoint the text names (explicit coordinates, then the
/// gazetteer for that label), then any gazetteer key the text contains.
pub fn rider_destination(arrive: &str, route: &Route, gazetteer: &Gazetteer) -> Option<Anchor> {
    route
        .endpoints()
        .into_iter()
        .filter(|endpoint| names_place(arrive, &endpoint.label))
        .find_map(|endpoint| gazetteer.resolve(endpoint))
        .or_else(|| {
            gazetteer.lookup_loose(arrive).map(|(key, point)| Anchor {
                label: key.to_string(),
                point,
            })
        })
}

/// Strictly-closer test with margin. A vehicle exactly `margin_km` closer
/// than the rider is still eligible.
pub fn has_passed(rider_to_destination_km: f64, vehicle_to_destination_km: f64, margin_km: f64) -> bool {
    vehicle_to_destination_km < rider_to_destination_km - margin_km
}

/// Decides whether the trip's vehicle can still serve the rider.
pub fn evaluate(
    trip: &Trip,
    route: &Route,
    intent: &RiderIntent,
    rider: Option<GeoPoint>,
    gazetteer: &Gazetteer,
    margin_km: f64,
) -> PassVerdict {
    let Some(arrive) = intent.arrive() else {
        return PassVerdict::Eligible;
    };

    if let Some(heading) = trip.direction.label() {
        if !names_place(arrive, heading) {
            return PassVerdict::WrongWay;
        }
    }

    let destination = rider_destination(arrive, route, gazetteer);
    if let (Some(destination), Some(rider)) = (destination, rider) {
        if rider.is_valid() && trip.position.is_valid() {
            let rider_km = distance_km(Some(rider), Some(destination.point));
            let vehicle_km = distance_km(Some(trip.position), Some(destination.point));
            if has_passed(rider_km, vehicle_km, margin_km) {
                return PassVerdict::AlreadyPassed;
            }
        }
    }

    PassVerdict::Eligible
}
