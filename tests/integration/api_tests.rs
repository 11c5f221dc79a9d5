//! API integration tests
//!
//! Run against a live server with a migrated database:
//! `cargo test --test api_tests -- --ignored`

use market_scan_server::models::operator::{OperatorClaims, Role};
use reqwest::{multipart, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-this-secret-in-production".to_string())
}

/// Sign a token the server accepts
fn token(role: Role) -> String {
    OperatorClaims {
        sub: "integration".to_string(),
        role,
        exp: chrono::Utc::now().timestamp() + 3600,
    }
    .create_token(&jwt_secret())
    .expect("Failed to sign token")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_pings_database() {
    let response = Client::new()
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_ingest_then_day_envelope() {
    let client = Client::new();

    let form = multipart::Form::new().part(
        "image",
        multipart::Part::bytes(b"\xff\xd8\xff\xe0fake-jpeg".to_vec()).file_name("frame.jpg"),
    );
    let response = client
        .post(format!("{}/cars", BASE_URL))
        .bearer_auth(token(Role::Operator))
        .query(&[
            ("car-number", "01T777TT"),
            ("car-date", "2024-01-01"),
            ("car-time", "08:00:00"),
        ])
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = client
        .get(format!("{}/cars/day?day=2024-01-01", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    for field in ["general", "general_count", "top10", "total_cars", "graphic"] {
        assert!(body.get(field).is_some(), "missing {field}");
    }
    assert!(body["top10"]
        .as_array()
        .expect("top10 array")
        .iter()
        .any(|entry| entry["car_number"] == "01T777TT"));
}

#[tokio::test]
#[ignore]
async fn test_ingest_requires_token() {
    let form = multipart::Form::new().part("image", multipart::Part::bytes(vec![1, 2, 3]));
    let response = Client::new()
        .post(format!("{}/cars?car-number=01T777TT&car-date=2024-01-01&car-time=08:00:00", BASE_URL))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_invalid_date_is_bad_request() {
    let response = Client::new()
        .get(format!("{}/cars/snapshot?date=2024", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
#[ignore]
async fn test_unknown_car_is_not_found() {
    let response = Client::new()
        .get(format!("{}/cars/ZZ000ZZZ?date=1999-01-01", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_exception_numbers_need_admin() {
    let client = Client::new();

    let response = client
        .post(format!("{}/exception-numbers", BASE_URL))
        .bearer_auth(token(Role::Operator))
        .json(&json!({ "number": "01S000SS" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .post(format!("{}/exception-numbers", BASE_URL))
        .bearer_auth(token(Role::Admin))
        .json(&json!({ "number": "01S000SS" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(
        response.status() == StatusCode::CREATED || response.status() == StatusCode::CONFLICT
    );
}

#[tokio::test]
#[ignore]
async fn test_attendance_window_roundtrip() {
    let client = Client::new();

    let response = client
        .put(format!("{}/attendance-window", BASE_URL))
        .bearer_auth(token(Role::Admin))
        .json(&json!({ "start_time": "07:00", "end_time": "19:00", "min_visits": 2 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = client
        .get(format!("{}/attendance-window", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["start_time"], "07:00");
    assert_eq!(body["end_time"], "19:00");
}

#[tokio::test]
#[ignore]
async fn test_export_rows() {
    let response = Client::new()
        .post(format!("{}/export", BASE_URL))
        .json(&json!([{ "car_number": "01A001AA", "visits": 3 }]))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.bytes().await.expect("Failed to read body");
    assert!(bytes.starts_with(b"PK"));
}
