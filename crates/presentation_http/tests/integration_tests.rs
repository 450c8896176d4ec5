//! End-to-end tests for the HTTP API over in-memory SQLite
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use application::{ApplicationError, GeocodingPort, LoadStore};
use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use domain::GeoLocation;
use infrastructure::{
    AppConfig, DatabaseConfig, SecurityConfig, SqliteLoadStore, create_pool, seed_sample_data,
};
use presentation_http::{AppState, create_app};
use serde_json::{Value, json};

const API_KEY: &str = "test-key-123";

/// Geocoder answering from a fixed gazetteer
struct StubGeocoder;

#[async_trait]
impl GeocodingPort for StubGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<GeoLocation>, ApplicationError> {
        let location = match place.trim().to_lowercase().as_str() {
            "chicago, il" => GeoLocation::new(41.8781, -87.6298).ok(),
            "dallas, tx" => GeoLocation::new(32.7767, -96.797).ok(),
            "los angeles, ca" => GeoLocation::new(34.0522, -118.2437).ok(),
            "detroit, mi" => GeoLocation::new(42.3314, -83.0458).ok(),
            "houston, tx" => GeoLocation::new(29.7604, -95.3698).ok(),
            "phoenix, az" => GeoLocation::new(33.4484, -112.074).ok(),
            "outage city" => {
                return Err(ApplicationError::ExternalService(
                    "nominatim unreachable".into(),
                ));
            },
            _ => None,
        };
        Ok(location)
    }
}

fn server_with(config: &AppConfig, seed: bool) -> TestServer {
    let pool = create_pool(&DatabaseConfig::in_memory()).unwrap();
    if seed {
        seed_sample_data(&pool).unwrap();
    }
    let store: Arc<dyn LoadStore> = Arc::new(SqliteLoadStore::new(Arc::new(pool)));
    let state = AppState::new(store, Arc::new(StubGeocoder), config);
    TestServer::new(create_app(state, config)).unwrap()
}

fn open_server() -> TestServer {
    server_with(&AppConfig::default(), true)
}

fn secured_server() -> TestServer {
    let config = AppConfig {
        security: SecurityConfig {
            api_key: Some(API_KEY.to_string().into()),
        },
        ..AppConfig::default()
    };
    server_with(&config, true)
}

fn booking_payload(load_id: &str) -> Value {
    json!({
        "mc_num": "MC-1023",
        "chosen_id": load_id,
        "initial_rate": "$1,200.00",
        "final_rate": 1300,
        "transcript": "Carrier accepted at 1300.",
        "sentiment": "positive",
        "duration": "184.5"
    })
}

// Authentication

#[tokio::test]
async fn public_paths_need_no_key() {
    let server = secured_server();

    server.get("/health").await.assert_status_ok();
    server.get("/ready").await.assert_status_ok();

    let index = server.get("/").await;
    index.assert_status_ok();
    assert_eq!(index.json::<Value>()["authentication"]["enabled"], true);
}

#[tokio::test]
async fn protected_paths_reject_missing_or_wrong_key() {
    let server = secured_server();

    let missing = server.get("/carriers").await;
    missing.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(missing.json::<Value>()["code"], "unauthorized");

    server
        .get("/carriers")
        .add_query_param("api_key", "wrong")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn key_accepted_from_header_or_query() {
    let server = secured_server();

    server
        .get("/carriers")
        .add_header(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_static(API_KEY),
        )
        .await
        .assert_status_ok();
    server
        .get("/carriers")
        .add_query_param("api_key", API_KEY)
        .await
        .assert_status_ok();
    server
        .get("/carriers")
        .add_query_param("key", API_KEY)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn responses_carry_request_id() {
    let server = open_server();
    let response = server.get("/health").await;
    assert!(response.headers().get("x-request-id").is_some());
}

// Webhook lookups

#[tokio::test]
async fn webhook_get_lists_all_loads_newest_pickup_first() {
    let server = open_server();

    let body = server.get("/webhook").await.json::<Value>();
    assert_eq!(body["count"], 3);
    let ids: Vec<&str> = body["loads"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["load_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["LOAD002", "LOAD001", "LOAD003"]);
}

#[tokio::test]
async fn webhook_get_by_load_id() {
    let server = open_server();

    let found = server.get("/webhook").add_query_param("load_id", "LOAD001").await;
    found.assert_status_ok();
    assert_eq!(found.json::<Value>()["load"]["origin"], "Los Angeles, CA");

    server
        .get("/webhook")
        .add_query_param("load_id", "LOAD999")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn webhook_get_by_city_ranks_loads() {
    let server = open_server();

    let response = server.get("/webhook").add_query_param("city", "Chicago, IL").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["closest_load"]["load_id"], "LOAD002");
    assert_eq!(body["closest_distance_miles"], 0.0);
    assert_eq!(body["total_loads_checked"], 3);
    assert_eq!(body["ranked"].as_array().unwrap().len(), 3);
}

// Booking

#[tokio::test]
async fn booking_flips_status_and_records_booking() {
    let server = open_server();

    let response = server.post("/webhook").json(&booking_payload("LOAD001")).await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["load"]["status"], "booked");
    assert_eq!(body["load"]["final_rate"], 1300.0);
    assert_eq!(body["booking"]["mc_num"], "1023");
    assert_eq!(body["rate_difference"], 100.0);

    let load = server.get("/carriers/LOAD001").await.json::<Value>();
    assert_eq!(load["load"]["status"], "booked");

    let bookings = server.get("/bookings").await.json::<Value>();
    assert_eq!(bookings["count"], 1);
    assert_eq!(bookings["bookings"][0]["load_id"], "LOAD001");
    assert_eq!(bookings["bookings"][0]["load"]["status"], "booked");
}

#[tokio::test]
async fn trailing_slash_webhook_still_books() {
    let server = open_server();
    server
        .post("/webhook/")
        .json(&json!({"mc_num": 1023, "chosen_id": "LOAD003"}))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn rebooking_conflicts_by_default() {
    let server = open_server();

    server
        .post("/webhook")
        .json(&booking_payload("LOAD002"))
        .await
        .assert_status_ok();
    let second = server.post("/webhook").json(&booking_payload("LOAD002")).await;
    second.assert_status(StatusCode::CONFLICT);
    assert_eq!(second.json::<Value>()["code"], "conflict");

    let bookings = server.get("/bookings").await.json::<Value>();
    assert_eq!(bookings["count"], 1);
}

#[tokio::test]
async fn rebooking_allowed_when_configured() {
    let mut config = AppConfig::default();
    config.booking.allow_rebooking = true;
    let server = server_with(&config, true);

    for _ in 0..2 {
        server
            .post("/webhook")
            .json(&booking_payload("LOAD002"))
            .await
            .assert_status_ok();
    }
    assert_eq!(server.get("/bookings").await.json::<Value>()["count"], 2);
}

#[tokio::test]
async fn missing_fields_are_rejected_without_side_effects() {
    let server = open_server();

    let no_mc = server
        .post("/webhook")
        .json(&json!({"chosen_id": "LOAD001"}))
        .await;
    no_mc.assert_status(StatusCode::BAD_REQUEST);
    assert!(no_mc.json::<Value>()["error"].as_str().unwrap().contains("mc_num"));

    let blank_id = server
        .post("/webhook")
        .json(&json!({"mc_num": "1023", "chosen_id": "   "}))
        .await;
    blank_id.assert_status(StatusCode::BAD_REQUEST);
    assert!(blank_id.json::<Value>()["error"].as_str().unwrap().contains("chosen_id"));

    assert_eq!(server.get("/bookings").await.json::<Value>()["count"], 0);
    let load = server.get("/carriers/LOAD001").await.json::<Value>();
    assert_eq!(load["load"]["status"], "pending");
}

#[tokio::test]
async fn sentinel_rate_is_rejected() {
    let server = open_server();

    let response = server
        .post("/webhook")
        .json(&json!({
            "mc_num": "1023",
            "chosen_id": "LOAD001",
            "initial_rate": "1200field2field2",
            "final_rate": "1300"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].as_str().unwrap().contains("initial_rate"));
}

#[tokio::test]
async fn unknown_load_is_not_found_and_writes_nothing() {
    let server = open_server();

    server
        .post("/webhook")
        .json(&booking_payload("LOAD404"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert_eq!(server.get("/bookings").await.json::<Value>()["count"], 0);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let server = open_server();
    let response = server
        .post("/webhook")
        .content_type("application/json")
        .text("{not json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "invalid_json");
}

// Distance queries

#[tokio::test]
async fn closest_requires_city() {
    let server = open_server();
    server
        .get("/distance/closest")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/distance/closest")
        .add_query_param("city", "  ")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn closest_reports_unknown_city() {
    let server = open_server();
    let response = server
        .get("/distance/closest")
        .add_query_param("city", "Atlantis")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "city_not_found");
    assert_eq!(body["city"], "Atlantis");
}

#[tokio::test]
async fn closest_geocoder_outage_is_service_unavailable() {
    let server = open_server();
    server
        .get("/distance/closest")
        .add_query_param("city", "Outage City")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn closest_without_locatable_loads() {
    let server = server_with(&AppConfig::default(), false);
    server
        .post("/carriers")
        .json(&json!({
            "load_id": "X1",
            "origin": "Nowhere, ZZ",
            "destination": "Dallas, TX",
            "weight": 1000
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .get("/distance/closest")
        .add_query_param("city", "Chicago, IL")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "no_loads_with_coordinates");
    assert_eq!(body["total_loads_checked"], 1);
}

#[tokio::test]
async fn closest_from_los_angeles() {
    let server = open_server();
    let body = server
        .get("/distance/closest")
        .add_query_param("city", "Los Angeles, CA")
        .await
        .json::<Value>();
    assert_eq!(body["closest_load"]["load_id"], "LOAD001");
    assert_eq!(body["ranked"][0]["min_distance_miles"], 0.0);
}

#[tokio::test]
async fn load_distance_reports_route_length() {
    let server = open_server();

    let body = server.get("/distance/load/LOAD003").await.json::<Value>();
    let miles = body["route_distance_miles"].as_f64().unwrap();
    assert!((200.0..250.0).contains(&miles), "Dallas-Houston was {miles}");
    assert!(((miles * 10.0).round() - miles * 10.0).abs() < 1e-6);

    server
        .get("/distance/load/LOAD404")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn load_distance_is_null_for_unknown_places() {
    let server = server_with(&AppConfig::default(), false);
    server
        .post("/carriers")
        .json(&json!({
            "load_id": "X2",
            "origin": "Chicago, IL",
            "destination": "Nowhere, ZZ",
            "weight": 500
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let body = server.get("/distance/load/X2").await.json::<Value>();
    assert!(body["route_distance_miles"].is_null());
    assert!(body["origin_location"].is_object());
    assert!(body["destination_location"].is_null());
}

// Carrier CRUD

#[tokio::test]
async fn carrier_lifecycle() {
    let server = open_server();
    let new_load = json!({
        "load_id": "LOAD010",
        "origin": "Denver, CO",
        "destination": "Omaha, NE",
        "weight": 18000,
        "pickup_datetime": "2024-02-01 07:00:00",
        "equipment_type": "Dry Van",
        "loadboard_rate": 1450
    });

    let created = server.post("/carriers").json(&new_load).await;
    created.assert_status(StatusCode::CREATED);
    assert_eq!(created.json::<Value>()["load"]["status"], "pending");

    server
        .post("/carriers")
        .json(&new_load)
        .await
        .assert_status(StatusCode::CONFLICT);

    let listed = server.get("/carriers").await.json::<Value>();
    assert_eq!(listed["count"], 4);
    assert_eq!(listed["loads"][0]["load_id"], "LOAD010");

    let updated = server
        .put("/carriers/LOAD010")
        .json(&json!({"loadboard_rate": 1500, "status": "ready"}))
        .await;
    updated.assert_status_ok();
    let updated = updated.json::<Value>();
    assert_eq!(updated["load"]["loadboard_rate"], 1500.0);
    assert_eq!(updated["load"]["status"], "ready");
    assert_eq!(updated["load"]["origin"], "Denver, CO");

    server
        .delete("/carriers/LOAD010")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete("/carriers/LOAD010")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/carriers/LOAD010")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn carrier_create_requires_core_fields() {
    let server = open_server();
    let response = server
        .post("/carriers")
        .json(&json!({"load_id": "LOAD011", "origin": "Denver, CO", "weight": 10}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].as_str().unwrap().contains("destination"));
}

#[tokio::test]
async fn carrier_update_edge_cases() {
    let server = open_server();

    server
        .put("/carriers/LOAD404")
        .json(&json!({"notes": "x"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .put("/carriers/LOAD001")
        .json(&json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .put("/carriers/LOAD001")
        .json(&json!({"weight": -5}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
