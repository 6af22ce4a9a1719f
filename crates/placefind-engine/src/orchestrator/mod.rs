//! The search state machine.
//!
//! One cycle runs `Idle -> Matching -> (QueryingPoi | QueryingGeocoder) ->
//! Published | Failed`. Every cycle takes a generation number when it
//! starts; writes to the published [`SearchSnapshot`] only land while that
//! generation is still the latest, so a slow early response can never
//! overwrite the results of a later query.

mod snapshot;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use placefind_core::{Coordinate, Place, Taxonomy};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::history::HistoryStore;
use crate::ports::{PlaceGeocoder, PoiSearch};

pub use snapshot::{Notice, Precondition, SearchOutcome, SearchPhase, SearchSnapshot};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Live input shorter than this (after trimming) clears the results.
pub const MIN_LIVE_QUERY_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Submit,
    Live,
    Quick,
}

struct Inner<P, G> {
    poi: P,
    geocoder: G,
    taxonomy: Taxonomy,
    history: Arc<HistoryStore>,
    debounce: Duration,
    generation: AtomicU64,
    snapshot: watch::Sender<SearchSnapshot>,
}

pub struct SearchOrchestrator<P, G> {
    inner: Arc<Inner<P, G>>,
}

impl<P, G> Clone for SearchOrchestrator<P, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, G> SearchOrchestrator<P, G>
where
    P: PoiSearch + 'static,
    G: PlaceGeocoder + 'static,
{
    #[must_use]
    pub fn new(
        poi: P,
        geocoder: G,
        taxonomy: Taxonomy,
        history: Arc<HistoryStore>,
        debounce: Duration,
    ) -> Self {
        let (snapshot, _) = watch::channel(SearchSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                poi,
                geocoder,
                taxonomy,
                history,
                debounce,
                generation: AtomicU64::new(0),
                snapshot,
            }),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.inner.snapshot.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    #[must_use]
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.inner.taxonomy
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.inner.history
    }

    #[must_use]
    pub fn origin(&self) -> Option<Coordinate> {
        self.inner.snapshot.borrow().origin
    }

    /// Records the user's position. Invalid coordinates count as unknown.
    pub fn set_origin(&self, origin: Option<Coordinate>) {
        let origin = origin.filter(|c| {
            let valid = c.is_valid();
            if !valid {
                tracing::warn!(origin = %c, "ignoring out-of-range origin");
            }
            valid
        });
        self.inner.snapshot.send_if_modified(|snapshot| {
            if snapshot.origin == origin {
                return false;
            }
            snapshot.origin = origin;
            true
        });
    }

    /// Explicit submission: always ends in a visible outcome and records the
    /// trimmed query in history when results are published.
    pub async fn submit(&self, text: &str) -> SearchOutcome {
        let query = text.trim();
        if query.is_empty() {
            return self.reject(Precondition::EmptyQuery);
        }
        let Some(origin) = self.origin() else {
            return self.reject(Precondition::MissingOrigin);
        };

        let generation = self.next_generation();
        tracing::info!(generation, query, "search submitted");
        self.run_cycle(generation, query, origin, Trigger::Submit).await
    }

    /// Searches a category's first filter directly, skipping the matcher and
    /// the geocoder fallback. Published results record the filter's name in
    /// history, the same entry a typed search for it would leave.
    pub async fn quick_search(&self, category_key: &str) -> SearchOutcome {
        let Some((category, filter)) = self
            .inner
            .taxonomy
            .category(category_key)
            .and_then(|c| c.primary_filter().map(|f| (c, f)))
        else {
            return self.reject(Precondition::UnknownCategory(category_key.to_owned()));
        };
        let Some(origin) = self.origin() else {
            return self.reject(Precondition::MissingOrigin);
        };

        let generation = self.next_generation();
        tracing::info!(generation, category = %category.key, "quick search");
        self.advance(generation, SearchPhase::QueryingPoi);
        let places = self.inner.poi.search_pois(category, filter, origin).await;
        let outcome = self.commit(generation, &category.label, places, Trigger::Quick);
        if matches!(outcome, SearchOutcome::Published { .. }) {
            self.record_history(&filter.display_name).await;
        }
        outcome
    }

    /// Feeds one live-typing input state.
    ///
    /// Every call supersedes all earlier ones. The search itself starts only
    /// after the debounce delay passes without a newer call; the returned
    /// handle resolves to that cycle's outcome. Returns `None` when the input
    /// is too short to search and the results were cleared instead.
    pub fn live_input(&self, text: &str) -> Option<JoinHandle<SearchOutcome>> {
        let generation = self.next_generation();
        let query = text.trim().to_owned();
        if query.chars().count() < MIN_LIVE_QUERY_CHARS {
            self.clear(generation);
            return None;
        }

        let this = self.clone();
        Some(tokio::spawn(async move {
            tokio::time::sleep(this.inner.debounce).await;
            if !this.is_current(generation) {
                tracing::debug!(generation, "live input superseded during debounce");
                return SearchOutcome::Superseded;
            }
            let Some(origin) = this.origin() else {
                tracing::debug!(generation, "live input ignored until origin is known");
                return SearchOutcome::MissingPrecondition(Precondition::MissingOrigin);
            };
            this.run_cycle(generation, &query, origin, Trigger::Live).await
        }))
    }

    /// Changes the selected place. Returns the place at `index`, or `None`
    /// (leaving the selection alone) if the index is out of range.
    pub fn select(&self, index: usize) -> Option<Place> {
        let mut chosen = None;
        self.inner.snapshot.send_if_modified(|snapshot| {
            let Some(place) = snapshot.places.get(index) else {
                return false;
            };
            chosen = Some(place.clone());
            if snapshot.selected == Some(index) {
                return false;
            }
            snapshot.selected = Some(index);
            true
        });
        chosen
    }

    async fn run_cycle(
        &self,
        generation: u64,
        query: &str,
        origin: Coordinate,
        trigger: Trigger,
    ) -> SearchOutcome {
        self.advance(generation, SearchPhase::Matching);

        let mut places = Vec::new();
        if let Some(m) = self.inner.taxonomy.match_text(query) {
            tracing::debug!(
                generation,
                category = %m.category.key,
                filter = %m.filter.display_name,
                "query matched POI category"
            );
            self.advance(generation, SearchPhase::QueryingPoi);
            places = self.inner.poi.search_pois(m.category, m.filter, origin).await;
        }

        if places.is_empty() {
            if !self.is_current(generation) {
                tracing::debug!(generation, "skipping geocoder fallback for superseded search");
                return SearchOutcome::Superseded;
            }
            self.advance(generation, SearchPhase::QueryingGeocoder);
            places = self.inner.geocoder.geocode_places(query, origin).await;
        }

        let outcome = self.commit(generation, query, places, trigger);
        if trigger == Trigger::Submit && matches!(outcome, SearchOutcome::Published { .. }) {
            self.record_history(query).await;
        }
        outcome
    }

    /// The single writer of `places` and `selected`.
    fn commit(
        &self,
        generation: u64,
        query: &str,
        mut places: Vec<Place>,
        trigger: Trigger,
    ) -> SearchOutcome {
        places.retain(|p| p.position.is_valid());
        let count = places.len();
        let notice = (count == 0 && trigger != Trigger::Live).then(|| Notice::NoResults {
            query: query.to_owned(),
        });

        let applied = self.inner.snapshot.send_if_modified(|snapshot| {
            if !self.is_current(generation) {
                return false;
            }
            snapshot.generation = generation;
            snapshot.phase = if count == 0 {
                SearchPhase::Failed
            } else {
                SearchPhase::Published
            };
            snapshot.query = Some(query.to_owned());
            snapshot.places = places;
            snapshot.selected = (count > 0).then_some(0);
            snapshot.notice = notice;
            true
        });

        if !applied {
            tracing::debug!(generation, query, "discarding stale search results");
            return SearchOutcome::Superseded;
        }
        if count == 0 {
            tracing::info!(generation, query, "search found no results");
            return SearchOutcome::NoResults;
        }

        tracing::info!(generation, query, count, "search results published");
        SearchOutcome::Published { count }
    }

    /// Appends to history off the async worker; the store does file I/O.
    async fn record_history(&self, entry: &str) {
        let history = Arc::clone(&self.inner.history);
        let owned = entry.to_owned();
        match tokio::task::spawn_blocking(move || history.append(&owned)).await {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => {
                tracing::warn!(entry, error = %err, "failed to persist search history");
            }
            Err(err) => {
                tracing::warn!(entry, error = %err, "search history task failed");
            }
        }
    }

    fn advance(&self, generation: u64, phase: SearchPhase) {
        self.inner.snapshot.send_if_modified(|snapshot| {
            if !self.is_current(generation) {
                return false;
            }
            snapshot.generation = generation;
            snapshot.phase = phase;
            snapshot.notice = None;
            true
        });
    }

    fn clear(&self, generation: u64) {
        self.inner.snapshot.send_if_modified(|snapshot| {
            if !self.is_current(generation) {
                return false;
            }
            snapshot.generation = generation;
            snapshot.phase = SearchPhase::Idle;
            snapshot.query = None;
            snapshot.places.clear();
            snapshot.selected = None;
            snapshot.notice = None;
            true
        });
    }

    fn reject(&self, precondition: Precondition) -> SearchOutcome {
        tracing::info!(%precondition, "search refused");
        if let Some(notice) = precondition.notice() {
            self.inner.snapshot.send_modify(|snapshot| {
                snapshot.notice = Some(notice);
            });
        }
        SearchOutcome::MissingPrecondition(precondition)
    }

    fn next_generation(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == generation
    }
}
