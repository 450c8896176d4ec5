//! Integration tests for the Nominatim client (wiremock-based)

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_geocoding::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient,
};

const fn dallas_json() -> &'static str {
    r#"[{
        "place_id": 297844271,
        "lat": "32.7762719",
        "lon": "-96.7968559",
        "display_name": "Dallas, Dallas County, Texas, United States"
    }]"#
}

fn client_for(server: &MockServer) -> NominatimGeocodingClient {
    NominatimGeocodingClient::new(&NominatimConfig::for_testing(server.uri())).unwrap()
}

#[tokio::test]
async fn test_geocode_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Dallas, TX"))
        .and(query_param("format", "jsonv2"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(dallas_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let location = client.geocode("Dallas, TX").await.unwrap().unwrap();

    assert!((location.latitude() - 32.776_271_9).abs() < 1e-9);
    assert!((location.longitude() + 96.796_855_9).abs() < 1e-9);
}

#[tokio::test]
async fn test_geocode_no_match_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.geocode("Atlantis").await.unwrap().is_none());
}

#[tokio::test]
async fn test_cache_serves_normalized_repeats() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(dallas_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.geocode("Dallas, TX").await.unwrap();
    let second = client.geocode("  dallas,   tx ").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(client.cached_entries().await, 1);
}

#[tokio::test]
async fn test_misses_are_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.geocode("Nowhere").await.unwrap().is_none());
    assert!(client.geocode("NOWHERE").await.unwrap().is_none());
}

#[tokio::test]
async fn test_server_error_is_retryable_and_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for _ in 0..2 {
        let err = client.geocode("Dallas, TX").await.unwrap_err();
        assert!(matches!(err, GeocodingError::ServiceUnavailable { status: 503 }));
        assert!(err.is_retryable());
    }
}

#[tokio::test]
async fn test_rate_limited_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.geocode("Dallas, TX").await.unwrap_err();
    assert!(matches!(err, GeocodingError::RateLimitExceeded));
}

#[tokio::test]
async fn test_client_error_not_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.geocode("Dallas, TX").await.unwrap_err();
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.geocode("Dallas, TX").await.unwrap_err();
    assert!(matches!(err, GeocodingError::ParseError(_)));
}

#[tokio::test]
async fn test_out_of_range_coordinates_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"[{"lat": "123.0", "lon": "10.0"}]"#),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.geocode("Somewhere").await.unwrap_err();
    assert!(matches!(err, GeocodingError::ParseError(_)));
}

#[tokio::test]
async fn test_country_filter_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("countrycodes", "us"))
        .respond_with(ResponseTemplate::new(200).set_body_string(dallas_json()))
        .expect(1)
        .mount(&server)
        .await;

    let config = NominatimConfig {
        country_filter: "us".to_string(),
        ..NominatimConfig::for_testing(server.uri())
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();
    assert!(client.geocode("Dallas, TX").await.unwrap().is_some());
}

#[tokio::test]
async fn test_timeout_maps_to_timeout_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(dallas_json())
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = NominatimConfig {
        timeout_secs: 1,
        ..NominatimConfig::for_testing(server.uri())
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();
    let err = client.geocode("Dallas, TX").await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_concurrent_misses_share_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(dallas_json())
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (a, b, c, d, e, f) = tokio::join!(
        client.geocode("Dallas, TX"),
        client.geocode("Dallas, TX"),
        client.geocode("dallas, tx"),
        client.geocode(" Dallas,  TX"),
        client.geocode("Dallas, TX"),
        client.geocode("DALLAS, TX"),
    );

    let first = a.unwrap();
    assert!(first.is_some());
    for other in [b, c, d, e, f] {
        assert_eq!(other.unwrap(), first);
    }
}

#[tokio::test]
async fn test_concurrent_failure_is_shared_but_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503).set_delay(std::time::Duration::from_millis(200)))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (a, b, c) = tokio::join!(
        client.geocode("Dallas, TX"),
        client.geocode("Dallas, TX"),
        client.geocode("Dallas, TX"),
    );
    for result in [a, b, c] {
        assert!(matches!(
            result.unwrap_err(),
            GeocodingError::ServiceUnavailable { status: 503 }
        ));
    }

    assert!(client.geocode("Dallas, TX").await.is_err());
}
