//! HTTP clients for the upstream place and routing providers.
//!
//! - [`OverpassClient`]: structured POI queries with radius escalation.
//! - [`GeocoderClient`]: free-text address/POI geocoding (Mapbox).
//! - [`DirectionsClient`]: driving routes (Mapbox).

pub mod directions;
pub mod error;
mod http;
pub mod geocoder;
pub mod overpass;

pub use directions::DirectionsClient;
pub use error::ProviderError;
pub use geocoder::GeocoderClient;
pub use overpass::{OverpassClient, RadiusSchedule};
