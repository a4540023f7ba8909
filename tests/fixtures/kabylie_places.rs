//! Real places in Algiers and Kabylie for realistic test fixtures.
//!
//! Town-centre coordinates, rounded to four decimals.

use transit_matcher::geo::GeoPoint;

/// A named place with coordinates.
#[derive(Debug, Clone)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Place {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

// ============================================================================
// Line terminals
// ============================================================================

pub const TIZI_OUZOU: Place = Place::new("Tizi Ouzou", 36.7118, 4.0505);
pub const ALGER: Place = Place::new("Alger", 36.7528, 3.0420);
pub const AZAZGA: Place = Place::new("Azazga", 36.7447, 4.3722);
pub const BEJAIA: Place = Place::new("Bejaia", 36.7509, 5.0567);

// ============================================================================
// Stops along the RN12 / RN5 corridor, east to west
// ============================================================================

pub const TAMDA: Place = Place::new("Tamda", 36.7167, 4.1333);
pub const DRAA_BEN_KHEDDA: Place = Place::new("Draa Ben Khedda", 36.7333, 3.9667);
pub const TADMAIT: Place = Place::new("Tadmait", 36.7442, 3.9011);
pub const THENIA: Place = Place::new("Thenia", 36.7247, 3.5564);
pub const BOUDOUAOU: Place = Place::new("Boudouaou", 36.7272, 3.4097);

/// Inside the 0.3 km arrival radius of the Alger anchor.
pub const ALGER_STATION: Place = Place::new("Alger gare routiere", 36.7530, 3.0421);
