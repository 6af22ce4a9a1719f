//! Canonical coordinates and the provider-order normalizer.
//!
//! Everything outside this module (and the HTTP clients that talk to the
//! providers) sees [`Coordinate`] only, which is always latitude-first.
//! Provider-native pairs travel as [`RawPair`] and are converted exclusively
//! through [`to_canonical`] and [`to_provider_order`].

use serde::{Deserialize, Serialize};

/// A WGS84 position in canonical `(lat, lon)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` when both components are finite and inside the WGS84 ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// The axis order a provider uses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderConvention {
    /// Latitude first. The Overpass POI index reports positions this way.
    LatLon,
    /// Longitude first (GeoJSON). The geocoder and the directions API use it.
    LonLat,
}

/// A coordinate pair in some provider's native order.
///
/// Deliberately has no `lat`/`lon` accessors: the only way to interpret it is
/// through [`to_canonical`] with the convention it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPair(pub f64, pub f64);

impl From<[f64; 2]> for RawPair {
    fn from(pair: [f64; 2]) -> Self {
        Self(pair[0], pair[1])
    }
}

/// Interpret a provider-native pair as a canonical coordinate.
#[must_use]
pub fn to_canonical(raw: RawPair, convention: ProviderConvention) -> Coordinate {
    match convention {
        ProviderConvention::LatLon => Coordinate::new(raw.0, raw.1),
        ProviderConvention::LonLat => Coordinate::new(raw.1, raw.0),
    }
}

/// Lay out a canonical coordinate in a provider's native order.
///
/// Every outbound request that embeds a position goes through here.
#[must_use]
pub fn to_provider_order(canonical: Coordinate, convention: ProviderConvention) -> RawPair {
    match convention {
        ProviderConvention::LatLon => RawPair(canonical.lat, canonical.lon),
        ProviderConvention::LonLat => RawPair(canonical.lon, canonical.lat),
    }
}
