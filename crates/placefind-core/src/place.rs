//! Unified search results and driving routes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, ProviderConvention};
use crate::distance::haversine_km;

/// Which upstream system produced a [`Place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceSource {
    /// Structured POI index (Overpass).
    Poi,
    /// Free-text address/POI geocoder.
    Geocoder,
}

impl PlaceSource {
    /// The coordinate order this source reports positions in.
    #[must_use]
    pub const fn convention(self) -> ProviderConvention {
        match self {
            PlaceSource::Poi => ProviderConvention::LatLon,
            PlaceSource::Geocoder => ProviderConvention::LonLat,
        }
    }
}

impl std::fmt::Display for PlaceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceSource::Poi => write!(f, "poi"),
            PlaceSource::Geocoder => write!(f, "geocoder"),
        }
    }
}

/// A geocoded search result with a canonical position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Unique within one result batch; opaque otherwise.
    pub id: String,
    pub display_name: String,
    /// Short label shown under the display name (geocoder results only).
    pub secondary_label: Option<String>,
    pub position: Coordinate,
    pub tags: BTreeMap<String, String>,
    pub source: PlaceSource,
    /// Marker colour of the POI category that produced this result, if any.
    pub category_color: Option<String>,
}

impl Place {
    /// Distance from `origin` to this place in kilometres.
    #[must_use]
    pub fn distance_km(&self, origin: Coordinate) -> f64 {
        haversine_km(origin, self.position)
    }
}

/// A driving path between two points, in canonical order.
///
/// Never partial: construction fails unless the path has at least two points,
/// all of them valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    path: Vec<Coordinate>,
    /// Total length reported by the routing provider, in metres.
    pub distance_m: Option<f64>,
    /// Expected travel time reported by the routing provider, in seconds.
    pub duration_s: Option<f64>,
}

impl Route {
    #[must_use]
    pub fn new(path: Vec<Coordinate>, distance_m: Option<f64>, duration_s: Option<f64>) -> Option<Self> {
        if path.len() < 2 || !path.iter().all(Coordinate::is_valid) {
            return None;
        }
        Some(Self {
            path,
            distance_m,
            duration_s,
        })
    }

    #[must_use]
    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    #[must_use]
    pub fn start(&self) -> Coordinate {
        self.path[0]
    }

    #[must_use]
    pub fn end(&self) -> Coordinate {
        self.path[self.path.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_conventions() {
        assert_eq!(PlaceSource::Poi.convention(), ProviderConvention::LatLon);
        assert_eq!(PlaceSource::Geocoder.convention(), ProviderConvention::LonLat);
    }

    #[test]
    fn source_serializes_lowercase() {
        let json = serde_json::to_string(&PlaceSource::Geocoder).unwrap();
        assert_eq!(json, "\"geocoder\"");
    }

    #[test]
    fn route_requires_two_points() {
        assert!(Route::new(vec![], None, None).is_none());
        assert!(Route::new(vec![Coordinate::new(1.0, 1.0)], None, None).is_none());
        let route = Route::new(
            vec![Coordinate::new(1.0, 1.0), Coordinate::new(1.1, 1.2)],
            Some(1200.0),
            None,
        )
        .unwrap();
        assert_eq!(route.start(), Coordinate::new(1.0, 1.0));
        assert_eq!(route.end(), Coordinate::new(1.1, 1.2));
    }

    #[test]
    fn route_rejects_invalid_points() {
        let path = vec![Coordinate::new(1.0, 1.0), Coordinate::new(95.0, 1.0)];
        assert!(Route::new(path, None, None).is_none());
    }
}
