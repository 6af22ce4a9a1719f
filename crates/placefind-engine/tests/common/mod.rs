//! In-memory provider fakes shared by the engine integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use placefind_core::{Coordinate, Place, PlaceSource, PoiCategory, PoiFilter, Route, Taxonomy};
use placefind_engine::{
    HistoryStore, MemoryStore, PlaceGeocoder, PoiSearch, RouteProvider, SearchOrchestrator,
    DEFAULT_DEBOUNCE,
};

pub const LAGOS: Coordinate = Coordinate::new(6.5244, 3.3792);

pub fn place(id: &str, lat: f64, lon: f64, source: PlaceSource) -> Place {
    Place {
        id: id.to_owned(),
        display_name: id.to_owned(),
        secondary_label: None,
        position: Coordinate::new(lat, lon),
        tags: BTreeMap::new(),
        source,
        category_color: None,
    }
}

#[derive(Clone)]
struct Scripted {
    delay: Duration,
    places: Vec<Place>,
}

/// Answers by filter value (POI) or query text (geocoder); unknown keys get
/// an immediate empty list. Records every call.
#[derive(Clone, Default)]
pub struct FakeProvider {
    responses: Arc<Mutex<HashMap<String, Scripted>>>,
    calls: Arc<Mutex<Vec<(String, Coordinate)>>>,
}

impl FakeProvider {
    pub fn respond(&self, key: &str, places: Vec<Place>) -> &Self {
        self.respond_after(key, Duration::ZERO, places)
    }

    pub fn respond_after(&self, key: &str, delay: Duration, places: Vec<Place>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(key.to_owned(), Scripted { delay, places });
        self
    }

    pub fn calls(&self) -> Vec<(String, Coordinate)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_keys(&self) -> Vec<String> {
        self.calls().into_iter().map(|(key, _)| key).collect()
    }

    async fn answer(&self, key: &str, origin: Coordinate) -> Vec<Place> {
        let scripted = {
            self.calls.lock().unwrap().push((key.to_owned(), origin));
            self.responses.lock().unwrap().get(key).cloned()
        };
        let Some(scripted) = scripted else {
            return Vec::new();
        };
        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        scripted.places
    }
}

impl PoiSearch for FakeProvider {
    async fn search_pois(
        &self,
        _category: &PoiCategory,
        filter: &PoiFilter,
        origin: Coordinate,
    ) -> Vec<Place> {
        self.answer(&format!("{}={}", filter.attribute_key, filter.attribute_value), origin)
            .await
    }
}

impl PlaceGeocoder for FakeProvider {
    async fn geocode_places(&self, text: &str, origin: Coordinate) -> Vec<Place> {
        self.answer(text, origin).await
    }
}

/// Straight-line routes, optionally delayed or withheld per call in order.
#[derive(Clone, Default)]
pub struct FakeRoutes {
    script: Arc<Mutex<VecDeque<(Duration, bool)>>>,
    calls: Arc<Mutex<Vec<(Coordinate, Coordinate)>>>,
}

impl FakeRoutes {
    pub fn then(&self, delay: Duration, found: bool) -> &Self {
        self.script.lock().unwrap().push_back((delay, found));
        self
    }

    pub fn calls(&self) -> Vec<(Coordinate, Coordinate)> {
        self.calls.lock().unwrap().clone()
    }
}

impl RouteProvider for FakeRoutes {
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Option<Route> {
        let (delay, found) = {
            self.calls.lock().unwrap().push((origin, destination));
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((Duration::ZERO, true))
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        found
            .then(|| Route::new(vec![origin, destination], None, None))
            .flatten()
    }
}

pub struct Harness {
    pub search: SearchOrchestrator<FakeProvider, FakeProvider>,
    pub poi: FakeProvider,
    pub geocoder: FakeProvider,
    pub history: Arc<HistoryStore>,
}

pub fn harness() -> Harness {
    let poi = FakeProvider::default();
    let geocoder = FakeProvider::default();
    let history = Arc::new(HistoryStore::load(Box::new(MemoryStore::new()), 10));
    let search = SearchOrchestrator::new(
        poi.clone(),
        geocoder.clone(),
        Taxonomy::builtin(),
        Arc::clone(&history),
        DEFAULT_DEBOUNCE,
    );
    Harness {
        search,
        poi,
        geocoder,
        history,
    }
}
