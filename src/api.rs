//! Request and response types of the boundary operations.

use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::geo::GeoPoint;
use crate::model::{Direction, FareTariff};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRequest {
    pub vehicle_id: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub rider_lat: Option<f64>,
    pub rider_lon: Option<f64>,
    pub depart_text: Option<String>,
    pub arrive_text: Option<String>,
    /// Whether the rider agrees to be shown to drivers.
    #[serde(default)]
    pub visible: bool,
}

impl QueryRequest {
    /// The rider's position, if both coordinates were sent and finite.
    pub fn rider(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.rider_lat, self.rider_lon)
    }
}

/// Outcome of a successful position update.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionUpdate {
    Updated {
        direction: Direction,
        waiting_riders: Vec<GeoPoint>,
    },
    /// The vehicle reached its destination and its trip was removed.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    Updated,
    Finished,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePositionResponse {
    pub status: UpdateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub waiting_riders: Vec<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<PositionUpdate, MatchError>> for UpdatePositionResponse {
    fn from(result: Result<PositionUpdate, MatchError>) -> Self {
        match result {
            Ok(PositionUpdate::Updated {
                direction,
                waiting_riders,
            }) => Self {
                status: UpdateStatus::Updated,
                direction: Some(direction),
                waiting_riders,
                error: None,
            },
            Ok(PositionUpdate::Finished) => Self {
                status: UpdateStatus::Finished,
                direction: None,
                waiting_riders: Vec::new(),
                error: None,
            },
            Err(err) => Self {
                status: UpdateStatus::Error,
                direction: None,
                waiting_riders: Vec::new(),
                error: Some(err.to_string()),
            },
        }
    }
}

/// A vehicle offered to a rider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleMatch {
    pub vehicle_id: String,
    pub driver_name: String,
    pub vehicle_model: Option<String>,
    pub plate: Option<String>,
    pub position: GeoPoint,
    /// Rider to vehicle, rounded to two decimals. Absent without a rider position.
    pub distance_km: Option<f64>,
    pub eta_min: Option<u32>,
    pub direction: Direction,
    pub origin_point: Option<GeoPoint>,
    pub dest_point: Option<GeoPoint>,
    pub tariffs: Vec<FareTariff>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopStatus {
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopResponse {
    pub status: StopStatus,
}
