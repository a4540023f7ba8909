//! Fuzzy matching between a rider's stated trip and a vehicle's route.
//!
//! Matching is by substring containment on normalized labels, so "tizi"
//! matches "tizi ouzou". The flip side is that a short query matches every
//! place containing it; callers get recall, not precision.

use crate::model::{Route, normalize_label};

/// What a rider typed, normalized. Blank fields are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiderIntent {
    depart: Option<String>,
    arrive: Option<String>,
}

impl RiderIntent {
    /// Normalizes both texts. Blank text counts as absent.
    pub fn new(depart: Option<&str>, arrive: Option<&str>) -> Self {
        let clean = |text: Option<&str>| text.map(normalize_label).filter(|text| !text.is_empty());
        Self {
            depart: clean(depart),
            arrive: clean(arrive),
        }
    }

    pub fn depart(&self) -> Option<&str> {
        self.depart.as_deref()
    }

    pub fn arrive(&self) -> Option<&str> {
        self.arrive.as_deref()
    }

    /// True when at least one field was supplied.
    pub fn is_active(&self) -> bool {
        self.depart.is_some() || self.arrive.is_some()
    }
}

/// True when `text` names the place `label`, i.e. is contained in it.
pub fn names_place(text: &str, label: &str) -> bool {
    label.contains(text)
}

/// Whether a route can carry the rider, in either direction.
///
/// - nothing supplied: every route matches
/// - both supplied: depart/arrive must fit v1/v2 or v2/v1
/// - one supplied: it must fit either endpoint
pub fn route_matches(intent: &RiderIntent, route: &Route) -> bool {
    let (v1, v2) = (route.v1.label.as_str(), route.v2.label.as_str());
    match (intent.depart(), intent.arrive()) {
        (None, None) => true,
        (Some(depart), Some(arrive)) => {
            (names_place(depart, v1) && names_place(arrive, v2))
                || (names_place(depart, v2) && names_place(arrive, v1))
        }
        (Some(text), None) | (None, Some(text)) => names_place(text, v1) || names_place(text, v2),
    }
}
