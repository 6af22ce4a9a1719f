//! Keeps the published route in step with the current endpoints.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use placefind_core::{Coordinate, Route};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::ports::RouteProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Resolved,
    /// Both endpoints were known but the provider had no route.
    Unavailable,
    /// An endpoint was missing; the route was cleared without a request.
    Invalidated,
    Superseded,
}

struct Pending {
    generation: u64,
    origin: Coordinate,
    destination: Coordinate,
}

struct Inner<R> {
    provider: R,
    generation: AtomicU64,
    route: watch::Sender<Option<Route>>,
}

pub struct RouteTracker<R> {
    inner: Arc<Inner<R>>,
}

impl<R> Clone for RouteTracker<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: RouteProvider + 'static> RouteTracker<R> {
    #[must_use]
    pub fn new(provider: R) -> Self {
        let (route, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                provider,
                generation: AtomicU64::new(0),
                route,
            }),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Route>> {
        self.inner.route.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> Option<Route> {
        self.inner.route.borrow().clone()
    }

    /// Re-resolves the route for new endpoints.
    ///
    /// The previous route is cleared at once. A resolution that finishes
    /// after a newer `update` started is discarded.
    pub async fn update(
        &self,
        origin: Option<Coordinate>,
        destination: Option<Coordinate>,
    ) -> RouteOutcome {
        match self.begin(origin, destination) {
            Some(pending) => self.resolve(pending).await,
            None => RouteOutcome::Invalidated,
        }
    }

    /// Like [`update`](Self::update), but claims its generation before
    /// returning so successive calls are ordered by call time.
    pub fn spawn_update(
        &self,
        origin: Option<Coordinate>,
        destination: Option<Coordinate>,
    ) -> JoinHandle<RouteOutcome> {
        let pending = self.begin(origin, destination);
        let this = self.clone();
        tokio::spawn(async move {
            match pending {
                Some(pending) => this.resolve(pending).await,
                None => RouteOutcome::Invalidated,
            }
        })
    }

    fn begin(&self, origin: Option<Coordinate>, destination: Option<Coordinate>) -> Option<Pending> {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner
            .route
            .send_if_modified(|route| route.take().is_some());

        match (origin, destination) {
            (Some(origin), Some(destination)) => Some(Pending {
                generation,
                origin,
                destination,
            }),
            _ => {
                tracing::debug!(generation, "route endpoint unavailable; route cleared");
                None
            }
        }
    }

    async fn resolve(&self, pending: Pending) -> RouteOutcome {
        let Pending {
            generation,
            origin,
            destination,
        } = pending;
        let route = self.inner.provider.route(origin, destination).await;
        let found = route.is_some();

        let mut current = false;
        self.inner.route.send_if_modified(|published| {
            if self.inner.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            current = true;
            let changed = published.is_some() || route.is_some();
            *published = route;
            changed
        });

        match (current, found) {
            (false, _) => {
                tracing::debug!(generation, "discarding superseded route");
                RouteOutcome::Superseded
            }
            (true, true) => {
                tracing::debug!(generation, %origin, %destination, "route published");
                RouteOutcome::Resolved
            }
            (true, false) => RouteOutcome::Unavailable,
        }
    }
}
