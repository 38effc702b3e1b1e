use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{appointment, auth, billing, business, client, dashboard, health, public, service, staff};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Accounts
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))

        // Businesses
        .route("/api/agenda/businesses", post(business::create_business).get(business::list_businesses))
        .route("/api/agenda/businesses/{business_id}", get(business::get_business).put(business::update_business))

        // Staff
        .route("/api/agenda/businesses/{business_id}/staff", post(staff::create_staff).get(staff::list_staff))
        .route("/api/agenda/businesses/{business_id}/staff/{staff_id}", get(staff::get_staff).put(staff::update_staff))

        // Services
        .route("/api/agenda/businesses/{business_id}/services", post(service::create_service).get(service::list_services))
        .route("/api/agenda/businesses/{business_id}/services/{service_id}", put(service::update_service))

        // Clients
        .route("/api/agenda/businesses/{business_id}/clients", post(client::create_client).get(client::list_clients))
        .route("/api/agenda/businesses/{business_id}/clients/{client_id}", put(client::update_client).delete(client::delete_client))
        .route("/api/agenda/businesses/{business_id}/clients/{client_id}/history", get(client::client_history))

        // Appointments
        .route("/api/agenda/businesses/{business_id}/appointments", post(appointment::create_appointment).get(appointment::list_appointments))
        .route("/api/agenda/businesses/{business_id}/appointments/{appointment_id}", get(appointment::get_appointment).put(appointment::update_appointment).delete(appointment::cancel_appointment))

        // Dashboard
        .route("/api/agenda/businesses/{business_id}/dashboard", get(dashboard::dashboard))

        // Public Booking Flow
        .route("/api/agenda/public/{slug}", get(public::get_business_page))
        .route("/api/agenda/public/{slug}/available-slots", get(public::available_slots))
        .route("/api/agenda/public/{slug}/book", post(public::book))

        // Billing
        .route("/api/billing/businesses/{business_id}/subscribe", post(billing::subscribe))
        .route("/api/billing/businesses/{business_id}/status", get(billing::subscription_status))
        .route("/api/billing/webhook", post(billing::payment_webhook))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        business_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
