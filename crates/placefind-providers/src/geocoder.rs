//! Client for the Mapbox forward geocoding API.
//!
//! Handles everything the POI taxonomy cannot: street addresses, named
//! landmarks, neighbourhoods. Features arrive with `center` in `(lon, lat)`
//! order and are converted through the normaliser before they become places.

use std::collections::{BTreeMap, HashSet};

use placefind_core::{to_canonical, to_provider_order, Coordinate, Place, PlaceSource, RawPair};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::ProviderError;
use crate::http::{build_client, parse_base_url, read_json, with_segments};

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub features: Vec<GeocodeFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeFeature {
    pub id: String,
    /// Formatted address.
    pub place_name: String,
    /// Short label, e.g. the street or POI name alone.
    #[serde(default)]
    pub text: Option<String>,
    /// `[lon, lat]`.
    #[serde(default)]
    pub center: Option<Vec<f64>>,
    #[serde(default)]
    pub place_type: Vec<String>,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl GeocodeFeature {
    /// Canonical position, or `None` if `center` is missing or malformed.
    #[must_use]
    pub fn position(&self) -> Option<Coordinate> {
        match self.center.as_deref() {
            Some(&[first, second]) => {
                Some(to_canonical(RawPair(first, second), PlaceSource::Geocoder.convention()))
                    .filter(Coordinate::is_valid)
            }
            _ => None,
        }
    }

    fn tags(&self) -> BTreeMap<String, String> {
        let mut tags: BTreeMap<String, String> = self
            .properties
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_owned())))
            .collect();
        if !self.place_type.is_empty() {
            tags.insert("place_type".to_owned(), self.place_type.join(","));
        }
        tags
    }

    fn into_place(self) -> Option<Place> {
        let position = self.position()?;
        let tags = self.tags();
        Some(Place {
            id: self.id,
            display_name: self.place_name,
            secondary_label: self.text.filter(|t| !t.trim().is_empty()),
            position,
            tags,
            source: PlaceSource::Geocoder,
            category_color: None,
        })
    }
}

pub struct GeocoderClient {
    client: Client,
    base_url: Url,
    access_token: String,
    limit: u32,
}

impl GeocoderClient {
    /// Creates a client pointed at the production Mapbox API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        limit: u32,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(access_token, timeout_secs, user_agent, limit, DEFAULT_BASE_URL)
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
        limit: u32,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            base_url: parse_base_url(base_url)?,
            access_token: access_token.to_owned(),
            limit,
        })
    }

    /// Builds the forward-geocoding URL with the query as an encoded path
    /// segment and the proximity bias in `(lon, lat)` order.
    fn forward_url(&self, text: &str, proximity: Coordinate) -> Result<Url, ProviderError> {
        let file = format!("{text}.json");
        let mut url = with_segments(
            &self.base_url,
            ["geocoding", "v5", "mapbox.places", file.as_str()],
        )?;

        let bias = to_provider_order(proximity, PlaceSource::Geocoder.convention());
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("autocomplete", "true")
            .append_pair("limit", &self.limit.to_string())
            .append_pair("proximity", &format!("{},{}", bias.0, bias.1));
        Ok(url)
    }

    /// Runs a forward-geocoding query and returns the raw features.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Http`] on network failure.
    /// - [`ProviderError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ProviderError::Deserialize`] if the body is not a feature collection.
    pub async fn geocode(
        &self,
        text: &str,
        proximity: Coordinate,
    ) -> Result<Vec<GeocodeFeature>, ProviderError> {
        let url = self.forward_url(text, proximity)?;
        let response = self.client.get(url).send().await?;
        let parsed: GeocodeResponse =
            read_json(response, &format!("geocode(query={text})")).await?;
        Ok(parsed.features)
    }

    /// Geocodes `text` near `origin` into places.
    ///
    /// Never fails: upstream errors are logged and yield an empty list.
    pub async fn search(&self, text: &str, origin: Coordinate) -> Vec<Place> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let features = match self.geocode(text, origin).await {
            Ok(features) => features,
            Err(err) => {
                tracing::warn!(query = text, error = %err, "geocoder request failed");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let places: Vec<Place> = features
            .into_iter()
            .filter_map(GeocodeFeature::into_place)
            .filter(|p| seen.insert(p.id.clone()))
            .collect();
        tracing::debug!(query = text, count = places.len(), "geocoder returned places");
        places
    }
}
