//! Integration tests for `DirectionsClient` using wiremock.

use placefind_core::Coordinate;
use placefind_providers::{DirectionsClient, ProviderError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORIGIN: Coordinate = Coordinate::new(6.5244, 3.3792);
const DESTINATION: Coordinate = Coordinate::new(6.6018, 3.3515);

fn test_client(base_url: &str) -> DirectionsClient {
    DirectionsClient::with_base_url("pk.test", 5, "placefind-test/0.1", base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn resolve_returns_canonical_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/directions/v5/mapbox/driving/3.3792,6.5244;3.3515,6.6018"))
        .and(query_param("geometries", "geojson"))
        .and(query_param("access_token", "pk.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Ok",
            "routes": [{
                "geometry": { "type": "LineString",
                              "coordinates": [[3.3792, 6.5244], [3.37, 6.56], [3.3515, 6.6018]] },
                "distance": 10234.2,
                "duration": 1534.0
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let route = test_client(&server.uri())
        .resolve(ORIGIN, DESTINATION)
        .await
        .expect("route should resolve");

    assert_eq!(route.start(), ORIGIN);
    assert_eq!(route.end(), DESTINATION);
    assert_eq!(route.path()[1], Coordinate::new(6.56, 3.37));
    assert_eq!(route.distance_m, Some(10234.2));
}

#[tokio::test]
async fn resolve_is_absent_when_no_route() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "NoRoute",
            "message": "No route found",
            "routes": []
        })))
        .mount(&server)
        .await;

    assert!(test_client(&server.uri())
        .resolve(ORIGIN, DESTINATION)
        .await
        .is_none());
}

#[tokio::test]
async fn resolve_is_absent_on_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.resolve(ORIGIN, DESTINATION).await.is_none());
    let err = client.directions(ORIGIN, DESTINATION).await.unwrap_err();
    assert!(matches!(err, ProviderError::UnexpectedStatus { status: 500, .. }));
}
