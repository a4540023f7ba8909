//! Tunable constants of the matcher.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::direction::DEFAULT_ARRIVAL_RADIUS_KM;
use crate::error::MatchError;
use crate::eta::DEFAULT_SPEED_KMH;
use crate::pass_filter::DEFAULT_PASS_MARGIN_KM;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Distance to the destination anchor that ends a trip.
    pub arrival_radius_km: f64,
    /// How long a trip stays visible to riders after its last update.
    pub trip_ttl_secs: i64,
    /// How long a rider's demand signal stays visible to drivers.
    pub demand_window_mins: i64,
    /// GPS noise tolerance for the already-passed check.
    pub pass_margin_km: f64,
    /// Average speed used for arrival estimates.
    pub average_speed_kmh: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            arrival_radius_km: DEFAULT_ARRIVAL_RADIUS_KM,
            trip_ttl_secs: 45,
            demand_window_mins: 15,
            pass_margin_km: DEFAULT_PASS_MARGIN_KM,
            average_speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl MatchOptions {
    /// Parses a (possibly partial) JSON document over the defaults.
    pub fn from_json_str(json: &str) -> Result<Self, MatchError> {
        let options: Self =
            serde_json::from_str(json).map_err(|err| MatchError::InvalidOptions(err.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Rejects non-finite values, non-positive radii, speeds and windows,
    /// and a negative pass margin.
    pub fn validate(&self) -> Result<(), MatchError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(MatchError::InvalidOptions(format!("{name} must be positive, got {value}")))
            }
        };

        positive("arrival_radius_km", self.arrival_radius_km)?;
        positive("average_speed_kmh", self.average_speed_kmh)?;
        if !self.pass_margin_km.is_finite() || self.pass_margin_km < 0.0 {
            return Err(MatchError::InvalidOptions(format!(
                "pass_margin_km must be non-negative, got {}",
                self.pass_margin_km
            )));
        }
        if self.trip_ttl_secs <= 0 || self.demand_window_mins <= 0 {
            return Err(MatchError::InvalidOptions("TTL windows must be positive".to_string()));
        }
        Ok(())
    }

    pub fn trip_ttl(&self) -> Duration {
        Duration::seconds(self.trip_ttl_secs)
    }

    pub fn demand_window(&self) -> Duration {
        Duration::minutes(self.demand_window_mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = MatchOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.trip_ttl(), Duration::seconds(45));
        assert_eq!(options.demand_window(), Duration::minutes(15));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = MatchOptions::from_json_str(r#"{ "trip_ttl_secs": 300 }"#).unwrap();
        assert_eq!(options.trip_ttl_secs, 300);
        assert_eq!(options.average_speed_kmh, 25.0);
    }

    #[test]
    fn test_rejects_zero_speed() {
        let result = MatchOptions::from_json_str(r#"{ "average_speed_kmh": 0 }"#);
        assert!(matches!(result, Err(MatchError::InvalidOptions(_))));
    }

    #[test]
    fn test_rejects_negative_ttl() {
        let options = MatchOptions {
            trip_ttl_secs: -1,
            ..MatchOptions::default()
        };
        assert!(options.validate().is_err());
    }
}
