mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// Always at least a week out so the date is never in the past mid-test.
fn next_monday_date() -> String {
    let mut next = Utc::now() + Duration::days(7);
    while next.format("%A").to_string() != "Monday" { next += Duration::days(1); }
    next.format("%Y-%m-%d").to_string()
}

fn next_sunday_date() -> String {
    let mut next = Utc::now() + Duration::days(7);
    while next.format("%A").to_string() != "Sunday" { next += Duration::days(1); }
    next.format("%Y-%m-%d").to_string()
}

async fn create_setup(app: &TestApp, duration_min: i64) -> (String, String, String, String) {
    let token = app.register_and_login("owner@example.com").await;

    let business = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/agenda/businesses")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(json!({"name": "Corte & Cia", "slug": "corte-cia"}).to_string())).unwrap()
    ).await.unwrap();
    let business_id = parse_body(business).await["id"].as_str().unwrap().to_string();

    let staff = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/agenda/businesses/{}/staff", business_id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(json!({"name": "Ana"}).to_string())).unwrap()
    ).await.unwrap();
    let staff_id = parse_body(staff).await["id"].as_str().unwrap().to_string();

    let service = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/agenda/businesses/{}/services", business_id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(json!({"name": "Corte", "duration_min": duration_min, "price": 50.0}).to_string())).unwrap()
    ).await.unwrap();
    let service_id = parse_body(service).await["id"].as_str().unwrap().to_string();

    (token, business_id, staff_id, service_id)
}

async fn fetch_slots(app: &TestApp, staff_id: &str, service_id: &str, date: &str) -> Value {
    let response = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!(
                "/api/agenda/public/corte-cia/available-slots?staff_id={}&service_id={}&date={}",
                staff_id, service_id, date
            ))
            .body(Body::empty()).unwrap()
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    parse_body(response).await
}

fn slot_times(body: &Value) -> Vec<String> {
    body["slots"].as_array().unwrap().iter()
        .map(|s| s["time"].as_str().unwrap().to_string())
        .collect()
}

async fn book_public(
    app: &TestApp,
    staff_id: &str,
    service_id: &str,
    date: &str,
    time: &str,
    email: &str,
) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/agenda/public/corte-cia/book")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({
                "staff_id": staff_id,
                "service_id": service_id,
                "date": date,
                "time": time,
                "client_name": "Cliente",
                "client_email": email
            }).to_string())).unwrap()
    ).await.unwrap();

    let status = response.status();
    (status, parse_body(response).await)
}

#[tokio::test]
async fn test_default_weekday_grid_has_18_slots() {
    let app = TestApp::new().await;
    let (_, _, staff_id, service_id) = create_setup(&app, 30).await;
    let date = next_monday_date();

    let body = fetch_slots(&app, &staff_id, &service_id, &date).await;
    assert_eq!(body["date"], date);

    let times = slot_times(&body);
    assert_eq!(times.len(), 18);
    assert_eq!(times[0], "09:00");
    assert_eq!(times[17], "17:30");
}

#[tokio::test]
async fn test_longer_service_trims_end_of_day() {
    let app = TestApp::new().await;
    let (_, _, staff_id, service_id) = create_setup(&app, 45).await;
    let date = next_monday_date();

    let body = fetch_slots(&app, &staff_id, &service_id, &date).await;
    let times = slot_times(&body);

    // A 45 minute service starting 17:30 would run past closing.
    assert_eq!(times.len(), 17);
    assert_eq!(times.last().unwrap(), "17:00");
}

#[tokio::test]
async fn test_booked_slot_is_removed() {
    let app = TestApp::new().await;
    let (_, _, staff_id, service_id) = create_setup(&app, 30).await;
    let date = next_monday_date();

    let (status, _) = book_public(&app, &staff_id, &service_id, &date, "10:00", "c1@example.com").await;
    assert_eq!(status, StatusCode::OK);

    let body = fetch_slots(&app, &staff_id, &service_id, &date).await;
    let times = slot_times(&body);

    assert_eq!(times.len(), 17);
    assert!(!times.contains(&"10:00".to_string()));
    // Bookings that merely touch a slot boundary do not block it.
    assert!(times.contains(&"09:30".to_string()));
    assert!(times.contains(&"10:30".to_string()));
}

#[tokio::test]
async fn test_canceled_appointment_frees_its_slot() {
    let app = TestApp::new().await;
    let (token, business_id, staff_id, service_id) = create_setup(&app, 30).await;
    let date = next_monday_date();

    let (status, body) = book_public(&app, &staff_id, &service_id, &date, "11:00", "c2@example.com").await;
    assert_eq!(status, StatusCode::OK);
    let appointment_id = body["appointment"]["id"].as_str().unwrap().to_string();

    let cancel = app.router.clone().oneshot(
        Request::builder().method("DELETE")
            .uri(format!("/api/agenda/businesses/{}/appointments/{}", business_id, appointment_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(cancel.status(), StatusCode::OK);

    let slots = fetch_slots(&app, &staff_id, &service_id, &date).await;
    assert!(slot_times(&slots).contains(&"11:00".to_string()));
}

#[tokio::test]
async fn test_sunday_is_closed_by_default() {
    let app = TestApp::new().await;
    let (_, _, staff_id, service_id) = create_setup(&app, 30).await;

    let body = fetch_slots(&app, &staff_id, &service_id, &next_sunday_date()).await;
    assert_eq!(body["slots"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_available_slots_requires_query_params() {
    let app = TestApp::new().await;
    let (_, _, _, service_id) = create_setup(&app, 30).await;

    let response = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!(
                "/api/agenda/public/corte-cia/available-slots?service_id={}&date={}",
                service_id, next_monday_date()
            ))
            .body(Body::empty()).unwrap()
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inactive_service_has_no_slots() {
    let app = TestApp::new().await;
    let (token, business_id, staff_id, service_id) = create_setup(&app, 30).await;

    let deactivate = app.router.clone().oneshot(
        Request::builder().method("PUT")
            .uri(format!("/api/agenda/businesses/{}/services/{}", business_id, service_id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(json!({"is_active": false}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(deactivate.status(), StatusCode::OK);

    let response = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!(
                "/api/agenda/public/corte-cia/available-slots?staff_id={}&service_id={}&date={}",
                staff_id, service_id, next_monday_date()
            ))
            .body(Body::empty()).unwrap()
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
