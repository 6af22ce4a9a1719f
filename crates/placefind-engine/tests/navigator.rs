//! Selection and origin changes drive the published route.

mod common;

use std::time::Duration;

use common::{harness, place, FakeRoutes, LAGOS};
use placefind_core::{PlaceSource, Route};
use placefind_engine::{Navigator, RouteTracker};
use tokio::sync::watch;

async fn wait_for_route(
    routes: &mut watch::Receiver<Option<Route>>,
    mut ready: impl FnMut(&Option<Route>) -> bool,
) {
    tokio::time::timeout(Duration::from_secs(5), routes.wait_for(|r| ready(r)))
        .await
        .expect("route update timed out")
        .expect("route channel closed");
}

#[tokio::test(start_paused = true)]
async fn route_follows_origin_and_selection() {
    let h = harness();
    let first = place("node/1", 6.53, 3.38, PlaceSource::Poi);
    let second = place("node/2", 6.60, 3.35, PlaceSource::Poi);
    h.poi.respond("amenity=fuel", vec![first.clone(), second.clone()]);
    let routes = FakeRoutes::default();
    let navigator = Navigator::spawn(&h.search, RouteTracker::new(routes.clone()));
    let mut published = navigator.routes();

    h.search.set_origin(Some(LAGOS));
    h.search.submit("gas station").await;
    wait_for_route(&mut published, |r| {
        r.as_ref().is_some_and(|r| r.end() == first.position)
    })
    .await;
    assert_eq!(navigator.route().unwrap().start(), LAGOS);

    h.search.select(1);
    wait_for_route(&mut published, |r| {
        r.as_ref().is_some_and(|r| r.end() == second.position)
    })
    .await;

    h.search.set_origin(None);
    wait_for_route(&mut published, Option::is_none).await;
    assert!(navigator.route().is_none());

    assert_eq!(
        routes.calls(),
        vec![(LAGOS, first.position), (LAGOS, second.position)]
    );
}

#[tokio::test(start_paused = true)]
async fn failed_search_drops_the_route() {
    let h = harness();
    let bank = place("node/1", 6.53, 3.38, PlaceSource::Poi);
    h.poi.respond("amenity=bank", vec![bank.clone()]);
    let navigator = Navigator::spawn(&h.search, RouteTracker::new(FakeRoutes::default()));
    let mut published = navigator.routes();

    h.search.set_origin(Some(LAGOS));
    h.search.submit("bank").await;
    wait_for_route(&mut published, Option::is_some).await;

    h.search.submit("Atlantis").await;
    wait_for_route(&mut published, Option::is_none).await;
}
