//! Overpass JSON response shapes.

use std::collections::BTreeMap;

use placefind_core::{to_canonical, Coordinate, PlaceSource, RawPair};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// One node, way, or relation from an `out center;` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
    /// Present on nodes.
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Present on ways and relations when center output was requested.
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassElement {
    /// Batch-unique identifier, e.g. `way/42`.
    #[must_use]
    pub fn place_id(&self) -> String {
        format!("{}/{}", self.kind, self.id)
    }

    /// Canonical position: the node's own point, or the aggregate center for
    /// ways and relations. `None` when the element carries neither.
    #[must_use]
    pub fn position(&self) -> Option<Coordinate> {
        let raw = match (self.kind.as_str(), self.lat, self.lon, self.center) {
            ("node", Some(lat), Some(lon), _) => RawPair(lat, lon),
            ("way" | "relation", _, _, Some(center)) => RawPair(center.lat, center.lon),
            _ => return None,
        };
        Some(to_canonical(raw, PlaceSource::Poi.convention())).filter(Coordinate::is_valid)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.tags
            .get("name")
            .map(String::as_str)
            .filter(|n| !n.trim().is_empty())
    }
}
