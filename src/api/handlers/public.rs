use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::PublicBookingRequest;
use crate::api::dtos::responses::SlotsResponse;
use crate::domain::models::appointment::{Appointment, NewAppointmentParams};
use crate::domain::models::client::Client;
use crate::domain::services::{availability, billing};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, Span};

pub async fn get_business_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let services: Vec<_> = state.service_repo.list_by_business(&business.id).await?
        .into_iter()
        .filter(|s| s.is_active)
        .map(|s| serde_json::json!({
            "id": s.id,
            "name": s.name,
            "description": s.description,
            "duration_min": s.duration_min,
            "price": s.price
        }))
        .collect();

    let staff: Vec<_> = state.staff_repo.list_by_business(&business.id).await?
        .into_iter()
        .filter(|m| m.is_active)
        .map(|m| serde_json::json!({
            "id": m.id,
            "name": m.name,
            "role": m.role
        }))
        .collect();

    Ok(Json(serde_json::json!({
        "id": business.id,
        "name": business.name,
        "slug": business.slug,
        "timezone": business.timezone,
        "logo_url": business.logo_url,
        "working_hours": business.working_hours(),
        "services": services,
        "staff": staff
    })))
}

pub async fn available_slots(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let staff_id = params.get("staff_id").ok_or(AppError::Validation("staff_id required".into()))?;
    let service_id = params.get("service_id").ok_or(AppError::Validation("service_id required".into()))?;
    let date_str = params.get("date").ok_or(AppError::Validation("date required".into()))?;

    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;

    let service = state.service_repo.find_by_id(&business.id, service_id).await?
        .filter(|s| s.is_active)
        .ok_or(AppError::NotFound("Service not found".into()))?;

    let staff = state.staff_repo.find_by_id(&business.id, staff_id).await?
        .filter(|m| m.is_active)
        .ok_or(AppError::NotFound("Staff member not found".into()))?;

    let tz: Tz = business.timezone.parse().unwrap_or(chrono_tz::UTC);

    let existing = state.appointment_repo
        .list_for_staff_between(&staff.id, day_window_start(date), day_window_end(date))
        .await?;

    let hours = business.working_hours();
    let slots = availability::generate_slots(
        hours.for_weekday(date.weekday()),
        tz,
        date,
        service.duration_min as i64,
        &existing,
    );

    Ok(Json(SlotsResponse {
        date: date_str.to_string(),
        slots,
    }))
}

pub async fn book(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(payload): Json<PublicBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    Span::current().record("business_id", &business.id);

    let service = state.service_repo.find_by_id(&business.id, &payload.service_id).await?
        .filter(|s| s.is_active)
        .ok_or(AppError::NotFound("Service not found".into()))?;

    let staff = state.staff_repo.find_by_id(&business.id, &payload.staff_id).await?
        .filter(|m| m.is_active)
        .ok_or(AppError::NotFound("Staff member not found".into()))?;

    billing::ensure_booking_allowed(
        &state.plan_policy,
        state.subscription_repo.as_ref(),
        state.appointment_repo.as_ref(),
        &business,
        Utc::now(),
    ).await?;

    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;
    let time = NaiveTime::parse_from_str(&payload.time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))?;

    let tz: Tz = business.timezone.parse().unwrap_or(chrono_tz::UTC);

    let start = availability::local_to_utc(tz, date, time)
        .ok_or(AppError::Validation("Requested time does not exist in the business timezone".into()))?;
    let end = start + Duration::minutes(service.duration_min as i64);

    // Checked before the client record is touched so a lost race leaves no
    // side effects behind.
    if availability::check_conflict(state.appointment_repo.as_ref(), &staff.id, start, end, None).await? {
        return Err(AppError::Conflict("Requested time is no longer available".into()));
    }

    let client = match state.client_repo.find_by_email(&business.id, &payload.client_email).await? {
        Some(existing) => existing,
        None => {
            let mut client = Client::new(business.id.clone(), payload.client_name, payload.client_email);
            client.phone = payload.client_phone;
            state.client_repo.create(&client).await?
        }
    };

    let appointment = Appointment::new(NewAppointmentParams {
        business_id: business.id.clone(),
        staff_id: staff.id,
        client_id: client.id.clone(),
        service_id: service.id,
        start,
        duration_min: service.duration_min,
        notes: payload.notes,
    });

    let created = state.appointment_repo.insert_if_vacant(&appointment).await?;

    info!("Public booking confirmed: {} for business {}", created.id, slug);

    Ok(Json(serde_json::json!({
        "appointment": created,
        "client_id": client.id
    })))
}

// Appointments are fetched over a padded UTC window; exact overlap is
// settled per candidate slot.
fn day_window_start(date: NaiveDate) -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)) - Duration::days(1)
}

fn day_window_end(date: NaiveDate) -> chrono::DateTime<Utc> {
    day_window_start(date) + Duration::days(3)
}
