//! Plain-text rendering for the terminal.

use placefind_core::{Coordinate, Route, Taxonomy};
use placefind_engine::{SearchPhase, SearchSnapshot};

pub(crate) fn print_snapshot(snapshot: &SearchSnapshot, origin: Coordinate) {
    if let Some(notice) = &snapshot.notice {
        println!("{notice}");
        return;
    }
    match snapshot.phase {
        SearchPhase::Published => {}
        SearchPhase::Failed => {
            println!("(no results)");
            return;
        }
        SearchPhase::Idle => {
            println!("(results cleared)");
            return;
        }
        SearchPhase::Matching | SearchPhase::QueryingPoi | SearchPhase::QueryingGeocoder => return,
    }

    println!(
        "{} result(s) for \"{}\":",
        snapshot.places.len(),
        snapshot.query.as_deref().unwrap_or_default()
    );
    println!(
        "  {:<3} {:<40} {:>9}  {:<9} POSITION",
        "#", "NAME", "DIST (km)", "SOURCE"
    );
    for (i, place) in snapshot.places.iter().enumerate() {
        let marker = if snapshot.selected == Some(i) { '*' } else { ' ' };
        println!(
            "{marker} {:<3} {:<40} {:>9.2}  {:<9} {}",
            i,
            truncate(&place.display_name, 40),
            place.distance_km(origin),
            place.source,
            place.position,
        );
        if let Some(label) = &place.secondary_label {
            println!("      {label}");
        }
    }
}

pub(crate) fn print_route(route: &Route) {
    let summary = match (route.distance_m, route.duration_s) {
        (Some(d), Some(t)) => format!(" ({:.1} km, {:.0} min)", d / 1000.0, t / 60.0),
        (Some(d), None) => format!(" ({:.1} km)", d / 1000.0),
        _ => String::new(),
    };
    println!(
        "route {} -> {}: {} points{summary}",
        route.start(),
        route.end(),
        route.path().len()
    );
}

pub(crate) fn print_categories(taxonomy: &Taxonomy) {
    for category in taxonomy.categories() {
        println!("{:<10} {} {}", category.key, category.label, category.color);
        for filter in &category.filters {
            println!(
                "    {:<16} {}={}",
                filter.display_name, filter.attribute_key, filter.attribute_value
            );
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut short: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    short.push('~');
    short
}
