//! Integration tests for `GeocodeClient` using wiremock HTTP mocks.

use serde_json::json;
use shuffood_core::Coordinate;
use shuffood_places::{GeocodeClient, PlacesError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GeocodeClient {
    GeocodeClient::with_base_url(Some("test-key"), 5, "shuffood-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn san_jose() -> Coordinate {
    Coordinate::new(37.3382, -121.8863).unwrap()
}

#[tokio::test]
async fn reverse_geocode_returns_locality() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("key", "test-key"))
        .and(query_param("latlng", "37.3382,-121.8863"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{
                "formatted_address": "200 E Santa Clara St, San Jose, CA 95113, USA",
                "address_components": [
                    { "long_name": "200", "short_name": "200", "types": ["street_number"] },
                    { "long_name": "San Jose", "short_name": "San Jose", "types": ["locality", "political"] }
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let label = test_client(&server.uri())
        .reverse_geocode(san_jose())
        .await
        .expect("geocode should succeed");
    assert_eq!(label, "San Jose");
}

#[tokio::test]
async fn zero_results_falls_back_to_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&server)
        .await;

    let label = test_client(&server.uri())
        .reverse_geocode(san_jose())
        .await
        .unwrap();
    assert_eq!(label, "37.3382, -121.8863");
}

#[tokio::test]
async fn denied_request_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .reverse_geocode(san_jose())
        .await
        .unwrap_err();
    assert!(
        matches!(err, PlacesError::Upstream { ref message, .. } if message == "The provided API key is invalid."),
        "got {err:?}"
    );
}

#[tokio::test]
async fn label_or_coordinates_swallows_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let label = test_client(&server.uri())
        .label_or_coordinates(san_jose())
        .await;
    assert_eq!(label, "37.3382, -121.8863");
}

#[tokio::test]
async fn missing_key_is_configuration_error() {
    let client =
        GeocodeClient::with_base_url(None, 5, "shuffood-test/0.1", "http://127.0.0.1:9").unwrap();
    let err = client.reverse_geocode(san_jose()).await.unwrap_err();
    assert!(matches!(err, PlacesError::MissingCredential));
}

#[tokio::test]
async fn transport_error_does_not_leak_api_key() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let client =
        GeocodeClient::with_base_url(Some("SECRET-KEY-123"), 5, "shuffood-test/0.1", &uri).unwrap();

    let err = client.reverse_geocode(san_jose()).await.unwrap_err();
    assert!(matches!(err, PlacesError::Network(_)), "got {err:?}");
    assert!(!err.to_string().contains("SECRET-KEY-123"), "{err}");
    assert!(!format!("{err:?}").contains("SECRET-KEY-123"), "{err:?}");
}
