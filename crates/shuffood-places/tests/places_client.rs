//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use std::time::Duration;

use serde_json::json;
use shuffood_core::{by_distance, Coordinate, QueryFilters};
use shuffood_places::{CandidateSource, PlacesClient, PlacesError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url(Some("test-key"), 5, "shuffood-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn origin() -> Coordinate {
    Coordinate::new(37.7749, -122.4194).unwrap()
}

/// A place `miles` north of the origin (one degree of latitude is ~69.09 mi).
fn place_north(id: &str, name: &str, miles: f64, rating: Option<f64>) -> serde_json::Value {
    let mut place = json!({
        "id": id,
        "displayName": { "text": name, "languageCode": "en" },
        "formattedAddress": format!("{id} Main St, San Francisco, CA"),
        "location": { "latitude": 37.7749 + miles / 69.09, "longitude": -122.4194 },
        "types": ["restaurant", "food"]
    });
    if let Some(r) = rating {
        place["rating"] = json!(r);
    }
    place
}

#[tokio::test]
async fn search_returns_candidates_with_distances() {
    let server = MockServer::start().await;

    let body = json!({
        "places": [
            place_north("p1", "Close Cafe", 0.5, Some(4.2)),
            place_north("p2", "Mid Grill", 5.0, None),
            place_north("p3", "Far Diner", 15.0, Some(3.9)),
        ]
    });

    Mock::given(method("POST"))
        .and(path("/v1/places:searchNearby"))
        .and(header("X-Goog-Api-Key", "test-key"))
        .and(body_partial_json(json!({
            "includedTypes": ["restaurant"],
            "maxResultCount": 20,
            "rankPreference": "DISTANCE"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let candidates = client
        .search_nearby(origin(), &QueryFilters::default())
        .await
        .expect("search should succeed");

    assert_eq!(candidates.len(), 3);
    assert_eq!(candidates[0].name, "Close Cafe");
    assert!((candidates[0].distance_miles - 0.5).abs() < 0.01);
    assert!((candidates[1].distance_miles - 5.0).abs() < 0.05);
    assert!((candidates[2].distance_miles - 15.0).abs() < 0.1);
    assert!(candidates[1].rating.abs() < f64::EPSILON, "missing rating defaults to 0");

    let within = by_distance(&candidates, 10.0);
    let ids: Vec<&str> = within.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
}

#[tokio::test]
async fn search_sends_baseline_and_cuisine_exclusions() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/places:searchNearby"))
        .and(body_partial_json(json!({
            "excludedTypes": [
                "primary_school",
                "secondary_school",
                "movie_theater",
                "shopping_mall",
                "grocery_store",
                "korean_restaurant"
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let filters = QueryFilters::new(5.0, 0.0, ["korean"]).unwrap();
    let candidates = test_client(&server.uri())
        .search_nearby(origin(), &filters)
        .await
        .expect("empty body should be an empty list");
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn search_applies_rating_floor_locally() {
    let server = MockServer::start().await;

    let body = json!({
        "places": [
            place_north("rated", "Rated", 1.0, Some(4.5)),
            place_north("unrated", "Unrated", 1.0, None),
            place_north("low", "Low", 1.0, Some(2.9)),
        ]
    });

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let filters = QueryFilters::new(10.0, 3.0, Vec::<String>::new()).unwrap();
    let candidates = test_client(&server.uri())
        .search_nearby(origin(), &filters)
        .await
        .unwrap();
    let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["rated"]);
}

#[tokio::test]
async fn missing_key_never_calls_the_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = PlacesClient::with_base_url(None, 5, "shuffood-test/0.1", &server.uri()).unwrap();
    let err = client
        .search_nearby(origin(), &QueryFilters::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PlacesError::MissingCredential), "got {err:?}");
}

#[tokio::test]
async fn upstream_error_carries_service_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "PERMISSION_DENIED"
            }
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_nearby(origin(), &QueryFilters::default())
        .await
        .unwrap_err();
    match err {
        PlacesError::Upstream { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid. Please pass a valid API key.");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn upstream_error_without_envelope_uses_status_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_nearby(origin(), &QueryFilters::default())
        .await
        .unwrap_err();
    assert!(
        matches!(err, PlacesError::Upstream { status: 503, ref message } if message == "Service Unavailable"),
        "got {err:?}"
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn malformed_success_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_nearby(origin(), &QueryFilters::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PlacesError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn slow_response_times_out_as_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client =
        PlacesClient::with_base_url(Some("test-key"), 1, "shuffood-test/0.1", &server.uri())
            .unwrap();
    let err = client
        .search_nearby(origin(), &QueryFilters::default())
        .await
        .unwrap_err();
    match err {
        PlacesError::Network(inner) => assert!(inner.is_timeout(), "expected timeout: {inner}"),
        other => panic!("expected Network, got {other:?}"),
    }
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let err = test_client(&uri)
        .search_nearby(origin(), &QueryFilters::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PlacesError::Network(_)), "got {err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn usable_through_candidate_source_trait() {
    async fn fetch<S: CandidateSource>(source: &S) -> usize {
        source
            .search_nearby(origin(), &QueryFilters::default())
            .await
            .map(|c| c.len())
            .unwrap_or(0)
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "places": [place_north("p1", "Only One", 0.2, Some(4.0))]
        })))
        .mount(&server)
        .await;

    assert_eq!(fetch(&test_client(&server.uri())).await, 1);
}
