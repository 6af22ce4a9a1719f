//! Search orchestration, route tracking and search history.

pub mod error;
pub mod history;
pub mod navigator;
pub mod orchestrator;
pub mod ports;
pub mod route;
pub mod store;

pub use error::StoreError;
pub use history::{HistoryStore, DEFAULT_HISTORY_CAPACITY, HISTORY_KEY};
pub use navigator::Navigator;
pub use orchestrator::{
    Notice, Precondition, SearchOrchestrator, SearchOutcome, SearchPhase, SearchSnapshot,
    DEFAULT_DEBOUNCE, MIN_LIVE_QUERY_CHARS,
};
pub use ports::{PlaceGeocoder, PoiSearch, RouteProvider};
pub use route::{RouteOutcome, RouteTracker};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
