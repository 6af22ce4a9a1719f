//! Seams between the engine and the upstream providers.
//!
//! Each port is the component-level contract: it never fails, degrading to
//! an empty or absent value instead. The HTTP clients implement them
//! directly; tests substitute in-memory fakes.

use std::future::Future;

use placefind_core::{Coordinate, Place, PoiCategory, PoiFilter, Route};
use placefind_providers::{DirectionsClient, GeocoderClient, OverpassClient};

/// Structured POI search with its own radius escalation.
pub trait PoiSearch: Send + Sync {
    fn search_pois(
        &self,
        category: &PoiCategory,
        filter: &PoiFilter,
        origin: Coordinate,
    ) -> impl Future<Output = Vec<Place>> + Send;
}

/// Free-text geocoding biased toward the origin.
pub trait PlaceGeocoder: Send + Sync {
    fn geocode_places(&self, text: &str, origin: Coordinate) -> impl Future<Output = Vec<Place>> + Send;
}

/// Driving routes between two canonical coordinates.
pub trait RouteProvider: Send + Sync {
    fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl Future<Output = Option<Route>> + Send;
}

impl PoiSearch for OverpassClient {
    async fn search_pois(
        &self,
        category: &PoiCategory,
        filter: &PoiFilter,
        origin: Coordinate,
    ) -> Vec<Place> {
        self.search(category, filter, origin).await
    }
}

impl PlaceGeocoder for GeocoderClient {
    async fn geocode_places(&self, text: &str, origin: Coordinate) -> Vec<Place> {
        self.search(text, origin).await
    }
}

impl RouteProvider for DirectionsClient {
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Option<Route> {
        self.resolve(origin, destination).await
    }
}
