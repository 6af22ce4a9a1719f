//! Client for the Overpass POI index.
//!
//! [`OverpassClient::search`] runs the radius escalation: one request per
//! radius in the [`RadiusSchedule`], strictly sequential, stopping at the first
//! non-empty result. A transport or parse failure ends the search immediately
//! with an empty result.

mod query;
mod schedule;
mod types;

use std::collections::HashSet;

use placefind_core::{Coordinate, Place, PlaceSource, PoiCategory, PoiFilter};
use reqwest::{Client, Url};

use crate::error::ProviderError;
use crate::http::{build_client, read_json};

pub use query::build_query;
pub use schedule::RadiusSchedule;
pub use types::{OverpassCenter, OverpassElement, OverpassResponse};

const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

pub struct OverpassClient {
    client: Client,
    endpoint: Url,
    schedule: RadiusSchedule,
}

impl OverpassClient {
    /// Creates a client pointed at the public Overpass instance.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        schedule: RadiusSchedule,
    ) -> Result<Self, ProviderError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, timeout_secs, user_agent, schedule)
    }

    /// Creates a client with a custom interpreter endpoint (mirrors, wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ProviderError::InvalidBaseUrl`] if `endpoint` does
    /// not parse.
    pub fn with_endpoint(
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
        schedule: RadiusSchedule,
    ) -> Result<Self, ProviderError> {
        let parsed = Url::parse(endpoint).map_err(|e| ProviderError::InvalidBaseUrl {
            url: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ProviderError::InvalidBaseUrl {
                url: endpoint.to_owned(),
                reason: "not an http(s) endpoint".to_owned(),
            });
        }

        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            endpoint: parsed,
            schedule,
        })
    }

    #[must_use]
    pub fn schedule(&self) -> RadiusSchedule {
        self.schedule
    }

    /// Issues one radius query and returns the raw elements.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Http`] on network failure.
    /// - [`ProviderError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ProviderError::Deserialize`] if the body is not an Overpass response.
    pub async fn fetch_elements(
        &self,
        filter: &PoiFilter,
        origin: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<OverpassElement>, ProviderError> {
        let query = build_query(filter, origin, radius_m);
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[("data", query.as_str())])
            .send()
            .await?;

        let parsed: OverpassResponse = read_json(
            response,
            &format!(
                "overpass {}={} radius={radius_m}",
                filter.attribute_key, filter.attribute_value
            ),
        )
        .await?;
        Ok(parsed.elements)
    }

    /// Finds places matching `filter` near `origin`, widening the radius until
    /// something is found or the schedule runs out.
    ///
    /// Never fails: upstream errors are logged and yield an empty list.
    pub async fn search(
        &self,
        category: &PoiCategory,
        filter: &PoiFilter,
        origin: Coordinate,
    ) -> Vec<Place> {
        let attempts = self.schedule.attempts();
        for (attempt, radius_m) in (1u32..).zip(self.schedule.radii()) {
            tracing::debug!(
                attempt,
                attempts,
                radius_m,
                key = %filter.attribute_key,
                value = %filter.attribute_value,
                "querying POI index"
            );

            let elements = match self.fetch_elements(filter, origin, radius_m).await {
                Ok(elements) => elements,
                Err(err) => {
                    tracing::warn!(
                        attempt,
                        radius_m,
                        error = %err,
                        "POI query failed; abandoning radius escalation"
                    );
                    return Vec::new();
                }
            };

            let places = elements_to_places(elements, category, filter);
            if !places.is_empty() {
                tracing::debug!(radius_m, count = places.len(), "POI query found results");
                return places;
            }
        }

        tracing::debug!(
            attempts,
            max_radius_m = self.schedule.radii().last(),
            "POI query exhausted radius schedule without results"
        );
        Vec::new()
    }
}

/// Maps raw elements to places, dropping those without a resolvable position
/// and repeated ids.
fn elements_to_places(
    elements: Vec<OverpassElement>,
    category: &PoiCategory,
    filter: &PoiFilter,
) -> Vec<Place> {
    let mut seen = HashSet::new();
    elements
        .into_iter()
        .filter_map(|element| {
            let position = element.position()?;
            let id = element.place_id();
            if !seen.insert(id.clone()) {
                return None;
            }
            let display_name = element
                .name()
                .map_or_else(|| format!("Unnamed {}", filter.display_name), str::to_owned);
            Some(Place {
                id,
                display_name,
                secondary_label: None,
                position,
                tags: element.tags,
                source: PlaceSource::Poi,
                category_color: Some(category.color.clone()),
            })
        })
        .collect()
}
