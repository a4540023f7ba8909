//! Place-name lookup and route anchor resolution.

use crate::geo::GeoPoint;
use crate::model::{RouteEndpoint, normalize_label};

/// A resolved route endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub label: String,
    pub point: GeoPoint,
}

/// Static table of known places.
///
/// Entries keep their insertion order; loose lookups return the first key
/// contained in the queried text.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: Vec<(String, GeoPoint)>,
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::new([
            ("tizi ouzou", GeoPoint::new(36.7118, 4.0505)),
            ("tizi", GeoPoint::new(36.7118, 4.0505)),
            ("alger", GeoPoint::new(36.7528, 3.0420)),
            ("oran", GeoPoint::new(35.6971, -0.6308)),
            ("bejaia", GeoPoint::new(36.7509, 5.0567)),
            ("bouira", GeoPoint::new(36.3749, 3.9020)),
            ("draa ben khedda", GeoPoint::new(36.7333, 3.9667)),
            ("dbk", GeoPoint::new(36.7333, 3.9667)),
            ("azazga", GeoPoint::new(36.7447, 4.3722)),
            ("freha", GeoPoint::new(36.7667, 4.3167)),
            ("tamda", GeoPoint::new(36.7167, 4.1333)),
        ])
    }
}

impl Gazetteer {
    /// Builds a table from `(label, point)` pairs, keeping their order.
    ///
    /// Labels are normalized; empty labels and non-finite points are dropped.
    pub fn new<L: AsRef<str>>(entries: impl IntoIterator<Item = (L, GeoPoint)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(label, point)| (normalize_label(label.as_ref()), point))
            .filter(|(label, point)| !label.is_empty() && point.is_valid())
            .collect();
        Self { entries }
    }

    /// Number of usable entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup by normalized label.
    pub fn lookup(&self, label: &str) -> Option<GeoPoint> {
        let label = normalize_label(label);
        self.entries
            .iter()
            .find(|(key, _)| *key == label)
            .map(|(_, point)| *point)
    }

    /// First entry whose key is contained in `text`.
    pub fn lookup_loose(&self, text: &str) -> Option<(&str, GeoPoint)> {
        let text = normalize_label(text);
        if text.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(key, _)| text.contains(key.as_str()))
            .map(|(key, point)| (key.as_str(), *point))
    }

    /// Resolves an endpoint: explicit coordinates, then exact label, then
    /// loose label. `None` means the endpoint must not be used for geometry.
    pub fn resolve(&self, endpoint: &RouteEndpoint) -> Option<Anchor> {
        let point = endpoint
            .point
            .filter(GeoPoint::is_valid)
            .or_else(|| self.lookup(&endpoint.label))
            .or_else(|| self.lookup_loose(&endpoint.label).map(|(_, point)| point))?;

        Some(Anchor {
            label: endpoint.label.clone(),
            point,
        })
    }
}
