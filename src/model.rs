//! Data model: routes, trips, demand signals and fares.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

const UNKNOWN_DIRECTION: &str = "unknown";

/// Normalizes free text for place comparison: lowercase, hyphens as spaces,
/// surrounding whitespace removed.
pub fn normalize_label(text: &str) -> String {
    text.to_lowercase().replace('-', " ").trim().to_string()
}

/// One end of a route: a place label and optionally its exact coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEndpoint {
    pub label: String,
    pub point: Option<GeoPoint>,
}

impl RouteEndpoint {
    pub fn new(label: &str) -> Self {
        Self {
            label: normalize_label(label),
            point: None,
        }
    }

    pub fn with_point(mut self, lat: f64, lon: f64) -> Self {
        self.point = GeoPoint::from_parts(Some(lat), Some(lon));
        self
    }
}

/// An undirected route between two endpoints.
///
/// `v1` is used as the origin anchor and `v2` as the destination anchor
/// for direction inference, but vehicles run both ways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub v1: RouteEndpoint,
    pub v2: RouteEndpoint,
}

impl Route {
    pub fn new(v1: RouteEndpoint, v2: RouteEndpoint) -> Self {
        Self { v1, v2 }
    }

    pub fn endpoints(&self) -> [&RouteEndpoint; 2] {
        [&self.v1, &self.v2]
    }

    /// Re-normalizes both labels, for records that came from outside.
    pub fn normalized(mut self) -> Self {
        self.v1.label = normalize_label(&self.v1.label);
        self.v2.label = normalize_label(&self.v2.label);
        self
    }
}

/// Where a vehicle is judged to be heading.
///
/// A known direction always carries one of its route's endpoint labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    Toward(String),
    Unknown,
}

impl Direction {
    pub fn label(&self) -> Option<&str> {
        match self {
            Direction::Toward(label) => Some(label),
            Direction::Unknown => None,
        }
    }
}

impl From<String> for Direction {
    fn from(value: String) -> Self {
        let label = normalize_label(&value);
        if label.is_empty() || label == UNKNOWN_DIRECTION {
            Direction::Unknown
        } else {
            Direction::Toward(label)
        }
    }
}

impl From<Direction> for String {
    fn from(value: Direction) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or(UNKNOWN_DIRECTION))
    }
}

/// The single active trip of a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub vehicle_id: String,
    pub position: GeoPoint,
    pub direction: Direction,
    /// Assigned by the server clock at write time.
    pub updated_at: DateTime<Utc>,
}

/// A rider's transient "I am here, going there" signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerRequest {
    pub position: GeoPoint,
    pub depart_text: Option<String>,
    pub arrive_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareTariff {
    pub destination_label: String,
    pub price: f64,
}

impl FareTariff {
    pub fn new(destination_label: &str, price: f64) -> Self {
        Self {
            destination_label: normalize_label(destination_label),
            price,
        }
    }
}

/// A registered vehicle and the line it serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub vehicle_id: String,
    pub driver_name: String,
    pub phone: Option<String>,
    pub plate: Option<String>,
    pub model: Option<String>,
    pub route: Route,
    #[serde(default)]
    pub tariffs: Vec<FareTariff>,
}

impl VehicleProfile {
    pub fn new(vehicle_id: impl Into<String>, driver_name: impl Into<String>, route: Route) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            driver_name: driver_name.into(),
            phone: None,
            plate: None,
            model: None,
            route,
            tariffs: Vec::new(),
        }
    }

    pub fn with_tariff(mut self, destination_label: &str, price: f64) -> Self {
        self.tariffs.push(FareTariff::new(destination_label, price));
        self
    }
}

/// Partial profile edit. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub driver_name: Option<String>,
    pub phone: Option<String>,
    pub plate: Option<String>,
    pub model: Option<String>,
    pub v1_label: Option<String>,
    pub v2_label: Option<String>,
    pub v1_lat: Option<f64>,
    pub v1_lon: Option<f64>,
    pub v2_lat: Option<f64>,
    pub v2_lon: Option<f64>,
    pub tariffs: Option<Vec<FareTariff>>,
}

impl ProfileUpdate {
    pub fn apply(self, profile: &mut VehicleProfile) {
        if let Some(name) = self.driver_name {
            profile.driver_name = name;
        }
        if self.phone.is_some() {
            profile.phone = self.phone;
        }
        if self.plate.is_some() {
            profile.plate = self.plate;
        }
        if self.model.is_some() {
            profile.model = self.model;
        }
        if let Some(label) = self.v1_label {
            profile.route.v1.label = normalize_label(&label);
        }
        if let Some(label) = self.v2_label {
            profile.route.v2.label = normalize_label(&label);
        }
        if let Some(point) = GeoPoint::from_parts(self.v1_lat, self.v1_lon) {
            profile.route.v1.point = Some(point);
        }
        if let Some(point) = GeoPoint::from_parts(self.v2_lat, self.v2_lon) {
            profile.route.v2.point = Some(point);
        }
        if let Some(tariffs) = self.tariffs {
            profile.tariffs = tariffs
                .into_iter()
                .map(|tariff| FareTariff::new(&tariff.destination_label, tariff.price))
                .collect();
        }
    }
}
