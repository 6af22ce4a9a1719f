//! Search cycle behaviour against in-memory providers.

mod common;

use std::time::Duration;

use common::{harness, place, LAGOS};
use placefind_core::{Coordinate, PlaceSource};
use placefind_engine::{Notice, Precondition, SearchOutcome, SearchPhase};

const LONDON: Coordinate = Coordinate::new(51.5237, -0.1586);

#[tokio::test]
async fn taxonomy_match_publishes_poi_results_and_records_history() {
    let h = harness();
    h.poi.respond(
        "amenity=restaurant",
        vec![
            place("node/1", 6.53, 3.38, PlaceSource::Poi),
            place("node/2", 6.51, 3.37, PlaceSource::Poi),
        ],
    );
    h.search.set_origin(Some(LAGOS));

    let outcome = h.search.submit("Restaurants").await;

    assert_eq!(outcome, SearchOutcome::Published { count: 2 });
    assert_eq!(h.poi.calls(), vec![("amenity=restaurant".to_owned(), LAGOS)]);
    assert!(h.geocoder.calls().is_empty());

    let snapshot = h.search.snapshot();
    assert_eq!(snapshot.phase, SearchPhase::Published);
    assert!(snapshot.places.iter().all(|p| p.source == PlaceSource::Poi));
    assert_eq!(snapshot.selected_place().map(|p| p.id.as_str()), Some("node/1"));
    assert_eq!(snapshot.notice, None);
    assert_eq!(h.history.entries(), vec!["Restaurants"]);
}

#[tokio::test]
async fn submission_records_trimmed_query() {
    let h = harness();
    h.poi.respond(
        "amenity=cafe",
        vec![place("node/3", 6.52, 3.37, PlaceSource::Poi)],
    );
    h.search.set_origin(Some(LAGOS));

    h.search.submit("  cafe \t").await;

    assert_eq!(h.history.entries(), vec!["cafe"]);
    assert_eq!(h.search.snapshot().query.as_deref(), Some("cafe"));
}

#[tokio::test]
async fn empty_poi_result_falls_back_to_geocoder() {
    let h = harness();
    h.geocoder.respond(
        "Restaurants",
        vec![place("poi.7", 6.52, 3.37, PlaceSource::Geocoder)],
    );
    h.search.set_origin(Some(LAGOS));

    let outcome = h.search.submit("Restaurants").await;

    assert_eq!(outcome, SearchOutcome::Published { count: 1 });
    assert_eq!(h.poi.call_keys(), vec!["amenity=restaurant"]);
    assert_eq!(h.geocoder.call_keys(), vec!["Restaurants"]);
    assert_eq!(h.search.snapshot().places[0].source, PlaceSource::Geocoder);
}

#[tokio::test]
async fn unmatched_text_goes_straight_to_geocoder() {
    let h = harness();
    h.geocoder.respond(
        "221B Baker Street",
        vec![place("address.1", 51.5237, -0.1586, PlaceSource::Geocoder)],
    );
    h.search.set_origin(Some(LONDON));

    let outcome = h.search.submit("  221B Baker Street ").await;

    assert_eq!(outcome, SearchOutcome::Published { count: 1 });
    assert!(h.poi.calls().is_empty());
    assert_eq!(h.geocoder.calls(), vec![("221B Baker Street".to_owned(), LONDON)]);
    assert_eq!(h.search.snapshot().places[0].position, LONDON);
    assert_eq!(h.history.entries(), vec!["221B Baker Street"]);
}

#[tokio::test]
async fn no_results_clears_list_and_shows_notice() {
    let h = harness();
    h.poi.respond("amenity=bank", vec![place("node/9", 6.5, 3.3, PlaceSource::Poi)]);
    h.search.set_origin(Some(LAGOS));
    h.search.submit("bank").await;
    assert_eq!(h.search.snapshot().places.len(), 1);

    let outcome = h.search.submit("Atlantis").await;

    assert_eq!(outcome, SearchOutcome::NoResults);
    let snapshot = h.search.snapshot();
    assert_eq!(snapshot.phase, SearchPhase::Failed);
    assert!(snapshot.places.is_empty());
    assert_eq!(snapshot.selected, None);
    assert_eq!(
        snapshot.notice,
        Some(Notice::NoResults {
            query: "Atlantis".to_owned()
        })
    );
    assert_eq!(h.history.entries(), vec!["bank"]);
}

#[tokio::test]
async fn empty_submission_is_refused_without_requests() {
    let h = harness();
    h.search.set_origin(Some(LAGOS));

    let outcome = h.search.submit("   ").await;

    assert_eq!(
        outcome,
        SearchOutcome::MissingPrecondition(Precondition::EmptyQuery)
    );
    assert!(h.poi.calls().is_empty());
    assert!(h.geocoder.calls().is_empty());
    assert!(h.history.is_empty());
    assert_eq!(h.search.snapshot().notice, Some(Notice::MissingQuery));
}

#[tokio::test]
async fn submission_without_origin_is_refused_without_requests() {
    let h = harness();

    let outcome = h.search.submit("cafe").await;

    assert_eq!(
        outcome,
        SearchOutcome::MissingPrecondition(Precondition::MissingOrigin)
    );
    assert!(h.poi.calls().is_empty());
    assert!(h.geocoder.calls().is_empty());
    assert_eq!(h.search.snapshot().notice, Some(Notice::MissingOrigin));
}

#[tokio::test]
async fn invalid_origin_counts_as_unknown() {
    let h = harness();
    h.search.set_origin(Some(Coordinate::new(120.0, 3.0)));
    assert_eq!(h.search.origin(), None);
    assert_eq!(
        h.search.submit("cafe").await,
        SearchOutcome::MissingPrecondition(Precondition::MissingOrigin)
    );
}

#[tokio::test]
async fn places_without_valid_position_are_never_published() {
    let h = harness();
    h.poi.respond(
        "amenity=atm",
        vec![
            place("node/1", f64::NAN, 3.38, PlaceSource::Poi),
            place("node/2", 6.51, 3.37, PlaceSource::Poi),
        ],
    );
    h.search.set_origin(Some(LAGOS));

    assert_eq!(
        h.search.submit("atm").await,
        SearchOutcome::Published { count: 1 }
    );
    assert_eq!(h.search.snapshot().places[0].id, "node/2");
    assert!(h.search.select(1).is_none());
}

#[tokio::test(start_paused = true)]
async fn late_response_from_superseded_cycle_is_discarded() {
    let h = harness();
    // "rest" matches no category, so cycle A waits on the slow geocoder.
    h.geocoder.respond_after(
        "rest",
        Duration::from_millis(500),
        vec![place("poi.rest", 6.6, 3.4, PlaceSource::Geocoder)],
    );
    h.poi.respond_after(
        "amenity=cafe",
        Duration::from_millis(10),
        vec![place("node/cafe", 6.52, 3.38, PlaceSource::Poi)],
    );
    h.search.set_origin(Some(LAGOS));

    let (a, b) = tokio::join!(h.search.submit("rest"), async {
        tokio::time::sleep(Duration::from_millis(1)).await;
        h.search.submit("cafe").await
    });

    assert_eq!(a, SearchOutcome::Superseded);
    assert_eq!(b, SearchOutcome::Published { count: 1 });
    let snapshot = h.search.snapshot();
    assert_eq!(snapshot.query.as_deref(), Some("cafe"));
    assert_eq!(
        snapshot.places.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
        vec!["node/cafe"]
    );
    assert_eq!(h.history.entries(), vec!["cafe"]);
}

#[tokio::test(start_paused = true)]
async fn superseded_cycle_skips_geocoder_fallback() {
    let h = harness();
    h.poi.respond_after("amenity=hospital", Duration::from_millis(200), vec![]);
    h.poi.respond("amenity=pharmacy", vec![place("node/3", 6.5, 3.3, PlaceSource::Poi)]);
    h.search.set_origin(Some(LAGOS));

    let (a, b) = tokio::join!(h.search.submit("hospital"), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        h.search.submit("pharmacy").await
    });

    assert_eq!(a, SearchOutcome::Superseded);
    assert_eq!(b, SearchOutcome::Published { count: 1 });
    assert!(h.geocoder.calls().is_empty());
}

#[tokio::test]
async fn quick_search_uses_first_filter_and_records_its_name() {
    let h = harness();
    h.poi.respond(
        "amenity=hospital",
        vec![place("node/5", 6.5, 3.4, PlaceSource::Poi)],
    );
    h.search.set_origin(Some(LAGOS));

    let outcome = h.search.quick_search("health").await;

    assert_eq!(outcome, SearchOutcome::Published { count: 1 });
    assert_eq!(h.poi.call_keys(), vec!["amenity=hospital"]);
    assert!(h.geocoder.calls().is_empty());
    assert_eq!(h.history.entries(), vec!["Hospital"]);
    assert_eq!(h.search.snapshot().query.as_deref(), Some("Health"));
}

#[tokio::test]
async fn quick_search_and_submission_share_history() {
    let h = harness();
    h.poi.respond(
        "amenity=restaurant",
        vec![place("node/1", 6.53, 3.38, PlaceSource::Poi)],
    );
    h.search.set_origin(Some(LAGOS));

    h.search.quick_search("food").await;
    h.search.submit("Restaurant").await;

    assert_eq!(h.history.entries(), vec!["Restaurant"]);
}

#[tokio::test]
async fn food_truck_shortcut_queries_food_truck_filter() {
    let h = harness();
    h.poi.respond(
        "amenity=food_truck",
        vec![place("node/9", 6.52, 3.38, PlaceSource::Poi)],
    );
    h.search.set_origin(Some(LAGOS));

    let outcome = h.search.quick_search("food_truck").await;

    assert_eq!(outcome, SearchOutcome::Published { count: 1 });
    assert_eq!(h.poi.call_keys(), vec!["amenity=food_truck"]);
    assert_eq!(h.history.entries(), vec!["Food Truck"]);
}

#[tokio::test]
async fn quick_search_with_zero_results_shows_notice_without_fallback() {
    let h = harness();
    h.search.set_origin(Some(LAGOS));

    let outcome = h.search.quick_search("lodging").await;

    assert_eq!(outcome, SearchOutcome::NoResults);
    assert!(h.geocoder.calls().is_empty());
    assert!(h.history.is_empty());
    assert_eq!(
        h.search.snapshot().notice,
        Some(Notice::NoResults {
            query: "Lodging".to_owned()
        })
    );
}

#[tokio::test]
async fn quick_search_rejects_unknown_category() {
    let h = harness();
    h.search.set_origin(Some(LAGOS));

    let outcome = h.search.quick_search("nightlife").await;

    assert_eq!(
        outcome,
        SearchOutcome::MissingPrecondition(Precondition::UnknownCategory("nightlife".to_owned()))
    );
    assert!(h.poi.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn only_last_keystroke_in_debounce_window_searches() {
    let h = harness();
    h.poi.respond("amenity=cafe", vec![place("node/1", 6.5, 3.3, PlaceSource::Poi)]);
    h.search.set_origin(Some(LAGOS));

    let first = h.search.live_input("caf").unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let second = h.search.live_input("cafe").unwrap();

    assert_eq!(first.await.unwrap(), SearchOutcome::Superseded);
    assert_eq!(second.await.unwrap(), SearchOutcome::Published { count: 1 });
    assert_eq!(h.poi.call_keys(), vec!["amenity=cafe"]);
    assert!(h.geocoder.calls().is_empty());
    assert!(h.history.is_empty(), "live typing never writes history");
}

#[tokio::test(start_paused = true)]
async fn inputs_further_apart_than_debounce_both_search() {
    let h = harness();
    h.poi.respond("tourism=hotel", vec![place("node/1", 6.5, 3.3, PlaceSource::Poi)]);
    h.poi.respond("amenity=bank", vec![place("node/2", 6.4, 3.2, PlaceSource::Poi)]);
    h.search.set_origin(Some(LAGOS));

    let hotel = h.search.live_input("hotel").unwrap().await.unwrap();
    let bank = h.search.live_input("bank").unwrap().await.unwrap();

    assert_eq!(hotel, SearchOutcome::Published { count: 1 });
    assert_eq!(bank, SearchOutcome::Published { count: 1 });
    assert_eq!(h.poi.call_keys(), vec!["tourism=hotel", "amenity=bank"]);
}

#[tokio::test(start_paused = true)]
async fn debounce_delay_elapses_before_request() {
    let h = harness();
    h.search.set_origin(Some(LAGOS));

    let pending = h.search.live_input("Lekki Phase 1").unwrap();
    tokio::time::sleep(Duration::from_millis(299)).await;
    assert!(h.geocoder.calls().is_empty());

    pending.await.unwrap();
    assert_eq!(h.geocoder.call_keys(), vec!["Lekki Phase 1"]);
}

#[tokio::test(start_paused = true)]
async fn short_live_input_clears_results() {
    let h = harness();
    h.poi.respond("amenity=bar", vec![place("node/1", 6.5, 3.3, PlaceSource::Poi)]);
    h.search.set_origin(Some(LAGOS));
    h.search.submit("bar").await;

    assert!(h.search.live_input("ba").is_none());

    let snapshot = h.search.snapshot();
    assert_eq!(snapshot.phase, SearchPhase::Idle);
    assert!(snapshot.places.is_empty());
    assert_eq!(snapshot.selected, None);
}

#[tokio::test(start_paused = true)]
async fn short_live_input_cancels_pending_search() {
    let h = harness();
    h.search.set_origin(Some(LAGOS));

    let pending = h.search.live_input("cafe").unwrap();
    assert!(h.search.live_input("c").is_none());

    assert_eq!(pending.await.unwrap(), SearchOutcome::Superseded);
    assert!(h.poi.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn live_search_without_results_clears_silently() {
    let h = harness();
    h.search.set_origin(Some(LAGOS));

    let outcome = h.search.live_input("Zzyzx Road").unwrap().await.unwrap();

    assert_eq!(outcome, SearchOutcome::NoResults);
    let snapshot = h.search.snapshot();
    assert_eq!(snapshot.phase, SearchPhase::Failed);
    assert!(snapshot.places.is_empty());
    assert_eq!(snapshot.notice, None);
}

#[tokio::test(start_paused = true)]
async fn submission_supersedes_pending_live_input() {
    let h = harness();
    h.poi.respond("amenity=parking", vec![place("node/1", 6.5, 3.3, PlaceSource::Poi)]);
    h.search.set_origin(Some(LAGOS));

    let pending = h.search.live_input("park").unwrap();
    let outcome = h.search.submit("parking").await;

    assert_eq!(outcome, SearchOutcome::Published { count: 1 });
    assert_eq!(pending.await.unwrap(), SearchOutcome::Superseded);
    assert_eq!(h.search.snapshot().query.as_deref(), Some("parking"));
}

#[tokio::test]
async fn select_changes_selection_within_range() {
    let h = harness();
    h.poi.respond(
        "shop=supermarket",
        vec![
            place("node/1", 6.5, 3.3, PlaceSource::Poi),
            place("node/2", 6.6, 3.4, PlaceSource::Poi),
        ],
    );
    h.search.set_origin(Some(LAGOS));
    h.search.submit("supermarket").await;
    let mut updates = h.search.subscribe();
    updates.borrow_and_update();

    let chosen = h.search.select(1).unwrap();

    assert_eq!(chosen.id, "node/2");
    assert!(updates.has_changed().unwrap());
    assert_eq!(h.search.snapshot().selected, Some(1));
    assert!(h.search.select(2).is_none());
    assert_eq!(h.search.snapshot().selected, Some(1));
}
