//! Client for the Mapbox driving directions API.

use placefind_core::{to_canonical, to_provider_order, Coordinate, ProviderConvention, RawPair, Route};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::ProviderError;
use crate::http::{build_client, parse_base_url, read_json, with_segments};

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

/// The directions API speaks GeoJSON: longitude first.
const ROUTING_CONVENTION: ProviderConvention = ProviderConvention::LonLat;

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// `"Ok"` on success; `"NoRoute"`, `"NoSegment"`, etc. otherwise.
    pub code: String,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    pub geometry: RouteGeometry,
    pub distance: Option<f64>,
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteGeometry {
    /// `[lon, lat]` pairs.
    pub coordinates: Vec<[f64; 2]>,
}

impl DirectionsResponse {
    /// The first route converted to canonical order, if the provider found one.
    #[must_use]
    pub fn into_route(self) -> Option<Route> {
        if self.code != "Ok" {
            return None;
        }
        let first = self.routes.into_iter().next()?;
        let path = first
            .geometry
            .coordinates
            .into_iter()
            .map(|pair| to_canonical(RawPair::from(pair), ROUTING_CONVENTION))
            .collect();
        Route::new(path, first.distance, first.duration)
    }
}

pub struct DirectionsClient {
    client: Client,
    base_url: Url,
    access_token: String,
}

impl DirectionsClient {
    /// Creates a client pointed at the production Mapbox API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(access_token: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(access_token, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ProviderError::InvalidBaseUrl`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            base_url: parse_base_url(base_url)?,
            access_token: access_token.to_owned(),
        })
    }

    fn driving_url(&self, origin: Coordinate, destination: Coordinate) -> Result<Url, ProviderError> {
        let from = to_provider_order(origin, ROUTING_CONVENTION);
        let to = to_provider_order(destination, ROUTING_CONVENTION);
        let waypoints = format!("{},{};{},{}", from.0, from.1, to.0, to.1);

        let mut url = with_segments(
            &self.base_url,
            ["directions", "v5", "mapbox", "driving", waypoints.as_str()],
        )?;
        url.query_pairs_mut()
            .append_pair("geometries", "geojson")
            .append_pair("overview", "full")
            .append_pair("access_token", &self.access_token);
        Ok(url)
    }

    /// Requests a driving route. `Ok(None)` means the provider answered but
    /// found no usable route.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Http`] on network failure.
    /// - [`ProviderError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ProviderError::Deserialize`] if the body is not a directions response.
    pub async fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Option<Route>, ProviderError> {
        let url = self.driving_url(origin, destination)?;
        let response = self.client.get(url).send().await?;
        let parsed: DirectionsResponse =
            read_json(response, &format!("directions({origin} -> {destination})")).await?;
        Ok(parsed.into_route())
    }

    /// Resolves a driving route, or `None` when there is none or the request fails.
    pub async fn resolve(&self, origin: Coordinate, destination: Coordinate) -> Option<Route> {
        match self.directions(origin, destination).await {
            Ok(Some(route)) => Some(route),
            Ok(None) => {
                tracing::debug!(%origin, %destination, "no driving route found");
                None
            }
            Err(err) => {
                tracing::warn!(%origin, %destination, error = %err, "directions request failed");
                None
            }
        }
    }
}
