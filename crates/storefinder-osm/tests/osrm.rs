//! Integration tests for `OsrmClient` using wiremock HTTP mocks.

use storefinder_core::LatLng;
use storefinder_osm::{ClientSettings, OsmError, OsrmClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> OsrmClient {
    let settings = ClientSettings {
        timeout_secs: 5,
        user_agent: "storefinder-test/0.1".to_owned(),
        max_retries: 0,
        backoff_base_ms: 0,
    };
    OsrmClient::new(&settings, base_url).expect("client construction should not fail")
}

const FROM: LatLng = LatLng::new(-23.5, -46.625);
const TO: LatLng = LatLng::new(-23.25, -46.5);
const ROUTE_PATH: &str = "/route/v1/driving/-46.625,-23.5;-46.5,-23.25";

#[tokio::test]
async fn route_returns_geometry_and_bounds() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "code": "Ok",
        "routes": [{
            "geometry": {
                "type": "LineString",
                "coordinates": [[-46.625, -23.5], [-46.7, -23.4], [-46.5, -23.25]]
            },
            "distance": 32150.2,
            "duration": 2410.7,
            "legs": []
        }],
        "waypoints": []
    });

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .and(query_param("overview", "full"))
        .and(query_param("geometries", "geojson"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let routes = client.route(FROM, TO).await.expect("should parse route");

    assert_eq!(routes.len(), 1);
    let route = &routes[0];
    assert_eq!(route.path.len(), 3);
    assert_eq!(route.path[1], LatLng::new(-23.4, -46.7));
    // The detour west widens the box beyond the endpoints.
    assert_eq!(route.bounds.west, -46.7);
    assert_eq!(route.bounds.east, -46.5);
    assert_eq!(route.bounds.south, -23.5);
    assert_eq!(route.bounds.north, -23.25);
    assert!((route.duration_s - 2410.7).abs() < 1e-9);
}

#[tokio::test]
async fn route_with_empty_list_returns_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"code": "Ok", "routes": []})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.route(FROM, TO).await.unwrap().is_empty());
}

#[tokio::test]
async fn no_route_code_on_400_is_empty_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "code": "NoRoute",
            "message": "Impossible route between points"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.route(FROM, TO).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_query_code_is_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "code": "InvalidQuery",
            "message": "Query string malformed"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.route(FROM, TO).await.unwrap_err();
    assert!(
        matches!(err, OsmError::Service { ref code, .. } if code == "InvalidQuery"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn server_error_without_body_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.route(FROM, TO).await.unwrap_err();
    assert!(matches!(
        err,
        OsmError::UnexpectedStatus { status: 502, .. }
    ));
}
