//! Overpass QL text for a single `key=value` radius query.

use placefind_core::{to_provider_order, Coordinate, PlaceSource, PoiFilter};

/// Server-side query timeout embedded in every request, in seconds.
const QUERY_TIMEOUT_SECS: u32 = 25;

/// Builds the Overpass QL selecting nodes, ways, and relations tagged
/// `filter.attribute_key = filter.attribute_value` within `radius_m` metres of
/// `origin`, with center points for ways and relations.
#[must_use]
pub fn build_query(filter: &PoiFilter, origin: Coordinate, radius_m: u32) -> String {
    let selector = format!(
        "[\"{}\"=\"{}\"]",
        escape(&filter.attribute_key),
        escape(&filter.attribute_value)
    );
    let raw = to_provider_order(origin, PlaceSource::Poi.convention());
    let around = format!("(around:{radius_m},{},{})", raw.0, raw.1);

    format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECS}];(node{selector}{around};way{selector}{around};relation{selector}{around};);out center;"
    )
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant() -> PoiFilter {
        PoiFilter {
            attribute_key: "amenity".to_owned(),
            attribute_value: "restaurant".to_owned(),
            display_name: "Restaurant".to_owned(),
        }
    }

    #[test]
    fn query_selects_all_element_kinds_with_center_output() {
        let q = build_query(&restaurant(), Coordinate::new(6.5244, 3.3792), 8_000);
        assert_eq!(
            q,
            "[out:json][timeout:25];(\
node[\"amenity\"=\"restaurant\"](around:8000,6.5244,3.3792);\
way[\"amenity\"=\"restaurant\"](around:8000,6.5244,3.3792);\
relation[\"amenity\"=\"restaurant\"](around:8000,6.5244,3.3792););out center;"
        );
    }

    #[test]
    fn query_places_latitude_first() {
        let q = build_query(&restaurant(), Coordinate::new(51.5237, -0.1586), 1_000);
        assert!(q.contains("(around:1000,51.5237,-0.1586)"), "{q}");
    }

    #[test]
    fn quotes_in_filters_are_escaped() {
        let filter = PoiFilter {
            attribute_key: "name".to_owned(),
            attribute_value: "Joe's \"Diner\"".to_owned(),
            display_name: "Diner".to_owned(),
        };
        let q = build_query(&filter, Coordinate::new(0.0, 0.0), 100);
        assert!(q.contains(r#"["name"="Joe's \"Diner\""]"#), "{q}");
    }
}
