//! Constant-speed arrival estimate.
//!
//! Ignores roads and traffic; the speed is a configured average, not
//! something measured from telemetry.

/// Default average speed assumption in km/h.
pub const DEFAULT_SPEED_KMH: f64 = 25.0;

/// Minutes to cover `distance_km` at `speed_kmh`, never less than one.
pub fn eta_minutes(distance_km: f64, speed_kmh: f64) -> u32 {
    let minutes = (distance_km / speed_kmh * 60.0).round();
    if minutes.is_nan() {
        return 1;
    }
    // `as` saturates on overflow
    (minutes as u32).max(1)
}
