//! Search and route command handlers.

use placefind_core::{AppConfig, Coordinate};
use placefind_engine::{Navigator, RouteOutcome, RouteTracker, SearchOutcome, SearchPhase};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::{build_directions, build_search};
use crate::output::{print_route, print_snapshot};

/// Explicit submission, optionally followed by a route to the selected place.
///
/// # Errors
///
/// Returns an error if the clients cannot be built or the search was refused.
pub(crate) async fn run_search(
    config: &AppConfig,
    text: &str,
    origin: Coordinate,
    with_route: bool,
) -> anyhow::Result<()> {
    let search = build_search(config)?;
    search.set_origin(Some(origin));

    if let SearchOutcome::MissingPrecondition(precondition) = search.submit(text).await {
        anyhow::bail!("search refused: {precondition}");
    }
    let snapshot = search.snapshot();
    print_snapshot(&snapshot, origin);

    if with_route {
        if let Some(destination) = snapshot.selected_place().map(|p| p.position) {
            resolve_and_print(config, origin, destination).await?;
        }
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the clients cannot be built or the category is unknown.
pub(crate) async fn run_quick(
    config: &AppConfig,
    category: &str,
    origin: Coordinate,
) -> anyhow::Result<()> {
    let search = build_search(config)?;
    search.set_origin(Some(origin));

    if let SearchOutcome::MissingPrecondition(precondition) = search.quick_search(category).await {
        let known: Vec<&str> = search
            .taxonomy()
            .categories()
            .iter()
            .map(|c| c.key.as_str())
            .collect();
        anyhow::bail!("{precondition}; known categories: {}", known.join(", "));
    }
    print_snapshot(&search.snapshot(), origin);
    Ok(())
}

/// Feeds stdin lines to the debounced live search and prints each settled
/// snapshot until EOF.
///
/// # Errors
///
/// Returns an error if the clients cannot be built or stdin cannot be read.
pub(crate) async fn run_live(
    config: &AppConfig,
    origin: Coordinate,
    with_route: bool,
) -> anyhow::Result<()> {
    let search = build_search(config)?;
    search.set_origin(Some(origin));

    let navigator = if with_route {
        Some(Navigator::spawn(&search, RouteTracker::new(build_directions(config)?)))
    } else {
        None
    };
    let route_printer = navigator.as_ref().map(|navigator| {
        let mut routes = navigator.routes();
        tokio::spawn(async move {
            while routes.changed().await.is_ok() {
                let route = routes.borrow_and_update().clone();
                if let Some(route) = route {
                    print_route(&route);
                }
            }
        })
    });

    let mut updates = search.subscribe();
    let printer = tokio::spawn(async move {
        let mut printed = None;
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            let settled = matches!(
                snapshot.phase,
                SearchPhase::Idle | SearchPhase::Published | SearchPhase::Failed
            );
            if settled && printed != Some(snapshot.generation) {
                printed = Some(snapshot.generation);
                print_snapshot(&snapshot, origin);
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = None;
    while let Some(line) = lines.next_line().await? {
        pending = search.live_input(&line).or(pending);
    }
    if let Some(last) = pending {
        let outcome = last.await?;
        tracing::debug!(?outcome, "live input finished");
    }

    // Both printers end once the last sender clone is gone.
    drop(navigator);
    drop(search);
    printer.await?;
    if let Some(route_printer) = route_printer {
        route_printer.await?;
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the directions client cannot be built.
pub(crate) async fn run_route(
    config: &AppConfig,
    from: Coordinate,
    to: Coordinate,
) -> anyhow::Result<()> {
    resolve_and_print(config, from, to).await
}

async fn resolve_and_print(
    config: &AppConfig,
    origin: Coordinate,
    destination: Coordinate,
) -> anyhow::Result<()> {
    let tracker = RouteTracker::new(build_directions(config)?);
    match (tracker.update(Some(origin), Some(destination)).await, tracker.current()) {
        (RouteOutcome::Resolved, Some(route)) => print_route(&route),
        _ => println!("no driving route found from {origin} to {destination}"),
    }
    Ok(())
}
