//! The matching service: vehicle position updates and rider queries.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::api::{
    PositionRequest, PositionUpdate, QueryRequest, StopResponse, StopStatus, UpdatePositionResponse,
    VehicleMatch,
};
use crate::clock::SystemClock;
use crate::config::MatchOptions;
use crate::direction::{Inference, infer_direction};
use crate::error::MatchError;
use crate::eta::eta_minutes;
use crate::fare::fares_for_direction;
use crate::gazetteer::Gazetteer;
use crate::geo::{GeoPoint, UNREACHABLE_KM, distance_km, round_km};
use crate::model::{Direction, ProfileUpdate, Trip, VehicleProfile};
use crate::pass_filter::{self, PassVerdict};
use crate::polyline::RouteLine;
use crate::route_matcher::{RiderIntent, route_matches};
use crate::store::{DemandStore, TripStateStore, VehicleRegistry};
use crate::traits::{Clock, PersistentStore};

pub struct MatchingService<S: ?Sized> {
    trips: TripStateStore<S>,
    demand: DemandStore<S>,
    vehicles: VehicleRegistry<S>,
    gazetteer: Gazetteer,
    options: MatchOptions,
}

impl<S: PersistentStore + ?Sized> MatchingService<S> {
    /// Service on the system clock and the built-in gazetteer.
    pub fn new(store: Arc<S>, options: MatchOptions) -> Result<Self, MatchError> {
        Self::with_parts(store, Arc::new(SystemClock), Gazetteer::default(), options)
    }

    pub fn with_parts(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        gazetteer: Gazetteer,
        options: MatchOptions,
    ) -> Result<Self, MatchError> {
        options.validate()?;
        Ok(Self {
            trips: TripStateStore::new(store.clone(), clock.clone()),
            demand: DemandStore::new(store.clone(), clock),
            vehicles: VehicleRegistry::new(store),
            gazetteer,
            options,
        })
    }

    pub fn trips(&self) -> &TripStateStore<S> {
        &self.trips
    }

    pub fn register_vehicle(&self, profile: VehicleProfile) -> Result<VehicleProfile, MatchError> {
        let profile = self.vehicles.register(profile)?;
        info!(vehicle_id = %profile.vehicle_id, v1 = %profile.route.v1.label, v2 = %profile.route.v2.label, "vehicle registered");
        Ok(profile)
    }

    /// Registered vehicles, whether or not they are on a trip.
    pub fn list_vehicles(&self) -> Result<Vec<VehicleProfile>, MatchError> {
        Ok(self.vehicles.list()?)
    }

    pub fn update_vehicle_profile(
        &self,
        vehicle_id: &str,
        update: ProfileUpdate,
    ) -> Result<VehicleProfile, MatchError> {
        self.vehicles
            .update(vehicle_id, update)?
            .ok_or_else(|| MatchError::UnknownVehicle(vehicle_id.to_string()))
    }

    /// Records a vehicle's position and infers its direction.
    ///
    /// Reaching the destination anchor removes the trip instead of
    /// updating it. On success the riders currently waiting for this
    /// direction are returned.
    pub fn update_position(&self, request: &PositionRequest) -> Result<PositionUpdate, MatchError> {
        let position = GeoPoint::new(request.lat, request.lon);
        if !position.in_range() {
            return Err(MatchError::InvalidPosition {
                lat: request.lat,
                lon: request.lon,
            });
        }

        let vehicle_id = request.vehicle_id.as_str();
        let profile = self
            .vehicles
            .get(vehicle_id)?
            .ok_or_else(|| MatchError::UnknownVehicle(vehicle_id.to_string()))?;

        let origin = self.gazetteer.resolve(&profile.route.v1);
        let destination = self.gazetteer.resolve(&profile.route.v2);

        match infer_direction(
            position,
            origin.as_ref(),
            destination.as_ref(),
            self.options.arrival_radius_km,
        ) {
            Inference::Completed => {
                self.trips.remove(vehicle_id)?;
                info!(vehicle_id, "vehicle reached its destination, trip finished");
                Ok(PositionUpdate::Finished)
            }
            Inference::Heading(direction) => {
                let trip = self.trips.upsert(vehicle_id, position, direction)?;
                debug!(vehicle_id, direction = %trip.direction, "trip updated");
                Ok(PositionUpdate::Updated {
                    waiting_riders: self.waiting_riders(&trip.direction),
                    direction: trip.direction,
                })
            }
        }
    }

    /// [`Self::update_position`] folded into the wire response.
    pub fn respond_to_position(&self, request: &PositionRequest) -> UpdatePositionResponse {
        let result = self.update_position(request);
        if let Err(err) = &result {
            warn!(vehicle_id = %request.vehicle_id, error = %err, "position update rejected");
        }
        result.into()
    }

    /// Positions of recent riders whose destination matches `direction`.
    ///
    /// The trip is already written when this runs, so a failed read only
    /// costs the rider list.
    fn waiting_riders(&self, direction: &Direction) -> Vec<GeoPoint> {
        let Some(heading) = direction.label() else {
            return Vec::new();
        };

        let requests = match self.demand.list_recent(self.options.demand_window()) {
            Ok(requests) => requests,
            Err(err) => {
                warn!(error = %err, "could not read rider demand");
                return Vec::new();
            }
        };

        requests
            .into_iter()
            .filter(|request| {
                request
                    .arrive_text
                    .as_deref()
                    .is_some_and(|arrive| heading.contains(arrive) || arrive.contains(heading))
            })
            .map(|request| request.position)
            .collect()
    }

    /// Vehicles that can serve the rider, nearest first.
    ///
    /// Never fails: a store outage yields an empty list.
    pub fn query(&self, request: &QueryRequest) -> Vec<VehicleMatch> {
        match self.try_query(request) {
            Ok(matches) => matches,
            Err(err) => {
                warn!(error = %err, "rider query failed");
                Vec::new()
            }
        }
    }

    pub fn try_query(&self, request: &QueryRequest) -> Result<Vec<VehicleMatch>, MatchError> {
        let rider = request.rider();
        let intent = RiderIntent::new(request.depart_text.as_deref(), request.arrive_text.as_deref());

        if request.visible && intent.is_active() {
            if let Some(rider) = rider {
                if let Err(err) = self.demand.append(rider, intent.depart(), intent.arrive()) {
                    warn!(error = %err, "could not record rider demand");
                }
            }
        }

        let trips = self.trips.list_active(self.options.trip_ttl())?;
        let mut matches: Vec<(f64, VehicleMatch)> = trips
            .par_iter()
            .filter_map(|trip| self.evaluate_trip(trip, rider, &intent))
            .collect();

        matches.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(matches.into_iter().map(|(_, found)| found).collect())
    }

    /// Builds the match record for one trip, or `None` if it does not
    /// qualify. The `f64` is the unrounded sort key.
    fn evaluate_trip(
        &self,
        trip: &Trip,
        rider: Option<GeoPoint>,
        intent: &RiderIntent,
    ) -> Option<(f64, VehicleMatch)> {
        let profile = match self.vehicles.get(&trip.vehicle_id) {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                warn!(vehicle_id = %trip.vehicle_id, "active trip has no vehicle profile, skipping");
                return None;
            }
            Err(err) => {
                warn!(vehicle_id = %trip.vehicle_id, error = %err, "vehicle lookup failed, skipping");
                return None;
            }
        };
        let route = &profile.route;

        if !route_matches(intent, route) {
            return None;
        }

        let verdict = pass_filter::evaluate(
            trip,
            route,
            intent,
            rider,
            &self.gazetteer,
            self.options.pass_margin_km,
        );
        if verdict != PassVerdict::Eligible {
            debug!(vehicle_id = %trip.vehicle_id, ?verdict, "vehicle filtered out");
            return None;
        }

        let v1 = self.gazetteer.resolve(&route.v1);
        let v2 = self.gazetteer.resolve(&route.v2);
        let line = RouteLine::oriented(route, v1.as_ref(), v2.as_ref(), &trip.direction, intent);

        let distance = rider
            .map(|rider| distance_km(Some(rider), Some(trip.position)))
            .filter(|km| *km < UNREACHABLE_KM);

        let found = VehicleMatch {
            vehicle_id: trip.vehicle_id.clone(),
            driver_name: profile.driver_name.clone(),
            vehicle_model: profile.model.clone(),
            plate: profile.plate.clone(),
            position: trip.position,
            distance_km: distance.map(round_km),
            eta_min: distance.map(|km| eta_minutes(km, self.options.average_speed_kmh)),
            direction: trip.direction.clone(),
            origin_point: line.origin,
            dest_point: line.destination,
            tariffs: fares_for_direction(&profile.tariffs, &trip.direction),
        };

        Some((distance.unwrap_or(UNREACHABLE_KM), found))
    }

    /// Ends the vehicle's trip unconditionally.
    pub fn stop_vehicle(&self, vehicle_id: &str) -> Result<StopResponse, MatchError> {
        self.trips.remove(vehicle_id)?;
        info!(vehicle_id, "vehicle stopped");
        Ok(StopResponse {
            status: StopStatus::Stopped,
        })
    }
}
