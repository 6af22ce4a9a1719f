//! Builds engine components from configuration.

use std::sync::Arc;
use std::time::Duration;

use placefind_core::{resolve_taxonomy, AppConfig, Coordinate};
use placefind_engine::{HistoryStore, JsonFileStore, SearchOrchestrator};
use placefind_providers::{DirectionsClient, GeocoderClient, OverpassClient, RadiusSchedule};

pub(crate) type Search = SearchOrchestrator<OverpassClient, GeocoderClient>;

pub(crate) fn checked_coordinate(lat: f64, lon: f64) -> anyhow::Result<Coordinate> {
    let coordinate = Coordinate::new(lat, lon);
    if !coordinate.is_valid() {
        anyhow::bail!("invalid coordinate: lat={lat}, lon={lon}");
    }
    Ok(coordinate)
}

pub(crate) fn open_history(config: &AppConfig) -> HistoryStore {
    HistoryStore::load(
        Box::new(JsonFileStore::new(&config.history_path)),
        config.history_capacity,
    )
}

/// # Errors
///
/// Returns an error if the taxonomy file is invalid or an HTTP client cannot
/// be built from the configured URLs.
pub(crate) fn build_search(config: &AppConfig) -> anyhow::Result<Search> {
    let taxonomy = resolve_taxonomy(config)?;
    let overpass = OverpassClient::with_endpoint(
        &config.overpass_url,
        config.request_timeout_secs,
        &config.user_agent,
        RadiusSchedule::from(config.radius),
    )?;
    let geocoder = GeocoderClient::with_base_url(
        &config.mapbox_access_token,
        config.request_timeout_secs,
        &config.user_agent,
        config.geocoder_limit,
        &config.mapbox_url,
    )?;

    Ok(SearchOrchestrator::new(
        overpass,
        geocoder,
        taxonomy,
        Arc::new(open_history(config)),
        Duration::from_millis(config.debounce_ms),
    ))
}

/// # Errors
///
/// Returns an error if the client cannot be built from the configured URL.
pub(crate) fn build_directions(config: &AppConfig) -> anyhow::Result<DirectionsClient> {
    Ok(DirectionsClient::with_base_url(
        &config.mapbox_access_token,
        config.request_timeout_secs,
        &config.user_agent,
        &config.mapbox_url,
    )?)
}
