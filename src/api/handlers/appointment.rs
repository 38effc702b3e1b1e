use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{AppointmentListQuery, CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::appointment::{Appointment, NewAppointmentParams};
use crate::domain::services::{availability, billing};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(business_id): Path<String>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    state.staff_repo.find_by_id(&business.id, &payload.staff_id).await?
        .ok_or(AppError::NotFound("Staff member not found".into()))?;

    state.client_repo.find_by_id(&business.id, &payload.client_id).await?
        .ok_or(AppError::NotFound("Client not found".into()))?;

    let service = state.service_repo.find_by_id(&business.id, &payload.service_id).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    if !service.is_active {
        return Err(AppError::Validation("Service is not active".into()));
    }

    billing::ensure_booking_allowed(
        &state.plan_policy,
        state.subscription_repo.as_ref(),
        state.appointment_repo.as_ref(),
        &business,
        Utc::now(),
    ).await?;

    let start = resolve_start(&business.timezone, &payload.date, &payload.time)?;

    let appointment = Appointment::new(NewAppointmentParams {
        business_id: business.id,
        staff_id: payload.staff_id,
        client_id: payload.client_id,
        service_id: payload.service_id,
        start,
        duration_min: service.duration_min,
        notes: payload.notes,
    });

    let created = state.appointment_repo.insert_if_vacant(&appointment).await?;

    info!("Created appointment {} for staff {}", created.id, created.staff_id);

    Ok(Json(created))
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(business_id): Path<String>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let from = query.from.as_deref().map(parse_rfc3339).transpose()?;
    let to = query.to.as_deref().map(parse_rfc3339).transpose()?;

    let mut appointments = state.appointment_repo.list_by_business(&business_id).await?;
    appointments.retain(|a| {
        query.staff_id.as_deref().is_none_or(|id| a.staff_id == id)
            && query.client_id.as_deref().is_none_or(|id| a.client_id == id)
            && query.status.as_deref().is_none_or(|s| a.status == s)
            && from.is_none_or(|f| a.start_time >= f)
            && to.is_none_or(|t| a.start_time < t)
    });

    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((business_id, appointment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let appointment = state.appointment_repo.find_by_id(&business_id, &appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    Ok(Json(appointment))
}

pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((business_id, appointment_id)): Path<(String, String)>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let mut appointment = state.appointment_repo.find_by_id(&business_id, &appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    if let Some(notes) = payload.notes {
        appointment.notes = Some(notes);
    }

    if let Some(status) = payload.status {
        if !matches!(status.as_str(), "scheduled" | "completed" | "canceled") {
            return Err(AppError::Validation("Unknown appointment status".into()));
        }
        appointment.status = status;
    }

    let mut needs_slot_check = false;

    if let Some(staff_id) = payload.staff_id {
        state.staff_repo.find_by_id(&business_id, &staff_id).await?
            .ok_or(AppError::NotFound("Staff member not found".into()))?;

        if staff_id != appointment.staff_id {
            appointment.staff_id = staff_id;
            needs_slot_check = true;
        }
    }

    match (payload.date, payload.time) {
        (Some(date), Some(time)) => {
            let service = state.service_repo.find_by_id(&business_id, &appointment.service_id).await?
                .ok_or(AppError::NotFound("Service not found".into()))?;

            let start = resolve_start(&business.timezone, &date, &time)?;
            appointment.start_time = start;
            appointment.end_time = start + Duration::minutes(service.duration_min as i64);
            needs_slot_check = true;
        }
        (None, None) => {}
        _ => return Err(AppError::Validation("Both date and time are required to reschedule".into())),
    }

    // The vacancy-checked update excludes the appointment itself, so moving
    // within its own window stays legal.
    let updated = if needs_slot_check && appointment.status == "scheduled" {
        state.appointment_repo.reschedule_if_vacant(&appointment).await?
    } else {
        state.appointment_repo.update(&appointment).await?
    };

    Ok(Json(updated))
}

// Cancellation keeps the row so client history survives.
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((business_id, appointment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let mut appointment = state.appointment_repo.find_by_id(&business_id, &appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    appointment.status = "canceled".to_string();
    let updated = state.appointment_repo.update(&appointment).await?;

    info!("Canceled appointment {}", updated.id);

    Ok(Json(updated))
}

fn resolve_start(timezone: &str, date: &str, time: &str) -> Result<DateTime<Utc>, AppError> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format, expected YYYY-MM-DD".into()))?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time format, expected HH:MM".into()))?;
    let tz: Tz = timezone.parse()
        .map_err(|_| AppError::Internal)?;

    availability::local_to_utc(tz, date, time)
        .ok_or(AppError::Validation("Requested time does not exist in the business timezone".into()))
}

fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::Validation("Invalid datetime filter, expected RFC 3339".into()))
}
