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

fn next_monday_date() -> String {
    let mut next = Utc::now() + Duration::days(7);
    while next.format("%A").to_string() != "Monday" { next += Duration::days(1); }
    next.format("%Y-%m-%d").to_string()
}

struct Setup {
    token: String,
    business_id: String,
    staff_id: String,
    service_id: String,
    client_id: String,
}

async fn create_setup(app: &TestApp) -> Setup {
    let token = app.register_and_login("owner@example.com").await;

    let business = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/agenda/businesses")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(json!({"name": "Clínica Flor", "slug": "clinica-flor"}).to_string())).unwrap()
    ).await.unwrap();
    let business_id = parse_body(business).await["id"].as_str().unwrap().to_string();

    let staff = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/agenda/businesses/{}/staff", business_id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(json!({"name": "Iris"}).to_string())).unwrap()
    ).await.unwrap();
    let staff_id = parse_body(staff).await["id"].as_str().unwrap().to_string();

    let service = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/agenda/businesses/{}/services", business_id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(json!({"name": "Limpeza", "duration_min": 30, "price": 150.0}).to_string())).unwrap()
    ).await.unwrap();
    let service_id = parse_body(service).await["id"].as_str().unwrap().to_string();

    let client = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/agenda/businesses/{}/clients", business_id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(json!({
                "name": "Helena",
                "email": "helena@example.com",
                "phone": "+55 11 98888-7777"
            }).to_string())).unwrap()
    ).await.unwrap();
    let client_id = parse_body(client).await["id"].as_str().unwrap().to_string();

    Setup { token, business_id, staff_id, service_id, client_id }
}

async fn book(app: &TestApp, setup: &Setup, date: &str, time: &str) {
    let response = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/agenda/businesses/{}/appointments", setup.business_id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", setup.token))
            .body(Body::from(json!({
                "staff_id": setup.staff_id,
                "client_id": setup.client_id,
                "service_id": setup.service_id,
                "date": date,
                "time": time
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_client_history_lists_latest_first() {
    let app = TestApp::new().await;
    let setup = create_setup(&app).await;
    let date = next_monday_date();

    book(&app, &setup, &date, "10:00").await;
    book(&app, &setup, &date, "14:00").await;

    let response = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!(
                "/api/agenda/businesses/{}/clients/{}/history",
                setup.business_id, setup.client_id
            ))
            .header(header::AUTHORIZATION, format!("Bearer {}", setup.token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["client"]["email"], "helena@example.com");

    let visits = body["appointments"].as_array().unwrap();
    assert_eq!(visits.len(), 2);
    assert_eq!(visits[0]["start_time"], format!("{}T17:00:00Z", date));
    assert_eq!(visits[1]["start_time"], format!("{}T13:00:00Z", date));
}

#[tokio::test]
async fn test_client_history_unknown_client() {
    let app = TestApp::new().await;
    let setup = create_setup(&app).await;

    let response = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!(
                "/api/agenda/businesses/{}/clients/{}/history",
                setup.business_id, "missing-client"
            ))
            .header(header::AUTHORIZATION, format!("Bearer {}", setup.token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_client_merges_fields() {
    let app = TestApp::new().await;
    let setup = create_setup(&app).await;

    let response = app.router.clone().oneshot(
        Request::builder().method("PUT")
            .uri(format!(
                "/api/agenda/businesses/{}/clients/{}",
                setup.business_id, setup.client_id
            ))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", setup.token))
            .body(Body::from(json!({"notes": "Allergic to lavender oil"}).to_string())).unwrap()
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["notes"], "Allergic to lavender oil");
    // Untouched fields survive the update.
    assert_eq!(body["name"], "Helena");
    assert_eq!(body["phone"], "+55 11 98888-7777");
}

#[tokio::test]
async fn test_delete_client_removes_record() {
    let app = TestApp::new().await;
    let setup = create_setup(&app).await;

    let response = app.router.clone().oneshot(
        Request::builder().method("DELETE")
            .uri(format!(
                "/api/agenda/businesses/{}/clients/{}",
                setup.business_id, setup.client_id
            ))
            .header(header::AUTHORIZATION, format!("Bearer {}", setup.token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["status"], "deleted");

    let list = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/agenda/businesses/{}/clients", setup.business_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", setup.token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(parse_body(list).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_client_routes_require_auth() {
    let app = TestApp::new().await;
    let setup = create_setup(&app).await;

    let response = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/agenda/businesses/{}/clients", setup.business_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
