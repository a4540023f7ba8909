//! Drives a vehicle along a path through the matching service.
//!
//! Handy for demos and for exercising the pipeline end to end without a
//! device in the field.

use crate::api::{PositionRequest, PositionUpdate};
use crate::error::MatchError;
use crate::polyline::Polyline;
use crate::service::MatchingService;
use crate::traits::PersistentStore;

/// Sends every point of `path` as a position update, stopping after the
/// first `Finished` outcome. Returns the outcomes in order.
pub fn replay<S: PersistentStore + ?Sized>(
    service: &MatchingService<S>,
    vehicle_id: &str,
    path: &Polyline,
) -> Result<Vec<PositionUpdate>, MatchError> {
    let mut outcomes = Vec::with_capacity(path.points().len());
    for point in path.points() {
        let outcome = service.update_position(&PositionRequest {
            vehicle_id: vehicle_id.to_string(),
            lat: point.lat,
            lon: point.lon,
        })?;
        let finished = outcome == PositionUpdate::Finished;
        outcomes.push(outcome);
        if finished {
            break;
        }
    }
    Ok(outcomes)
}
