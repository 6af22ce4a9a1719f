//! Wires search state to the route tracker.
//!
//! Watches the search snapshot and re-resolves the route whenever the origin
//! or the selected place's position changes.

use placefind_core::{Coordinate, Route};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::orchestrator::{SearchOrchestrator, SearchSnapshot};
use crate::ports::{PlaceGeocoder, PoiSearch, RouteProvider};
use crate::route::RouteTracker;

type Endpoints = (Option<Coordinate>, Option<Coordinate>);

fn endpoints(snapshot: &SearchSnapshot) -> Endpoints {
    (snapshot.origin, snapshot.selected_place().map(|p| p.position))
}

/// Background task driving a [`RouteTracker`]. Stops when dropped.
pub struct Navigator {
    task: JoinHandle<()>,
    routes: watch::Receiver<Option<Route>>,
}

impl Navigator {
    #[must_use]
    pub fn spawn<P, G, R>(search: &SearchOrchestrator<P, G>, tracker: RouteTracker<R>) -> Self
    where
        P: PoiSearch + 'static,
        G: PlaceGeocoder + 'static,
        R: RouteProvider + 'static,
    {
        let routes = tracker.subscribe();
        let mut snapshots = search.subscribe();

        let task = tokio::spawn(async move {
            let mut last: Option<Endpoints> = None;
            loop {
                let current = endpoints(&snapshots.borrow_and_update());
                if last != Some(current) {
                    last = Some(current);
                    let (origin, destination) = current;
                    drop(tracker.spawn_update(origin, destination));
                }
                if snapshots.changed().await.is_err() {
                    break;
                }
            }
        });

        Self { task, routes }
    }

    #[must_use]
    pub fn routes(&self) -> watch::Receiver<Option<Route>> {
        self.routes.clone()
    }

    #[must_use]
    pub fn route(&self) -> Option<Route> {
        self.routes.borrow().clone()
    }
}

impl Drop for Navigator {
    fn drop(&mut self) {
        self.task.abort();
    }
}
