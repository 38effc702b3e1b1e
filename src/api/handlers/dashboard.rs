use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::AuthUser;
use crate::domain::services::availability;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(business_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let tz: Tz = business.timezone.parse().map_err(|_| AppError::Internal)?;
    let now = Utc::now();
    let today = now.with_timezone(&tz).date_naive();

    // Day and week windows are anchored to business-local midnight, then
    // queried in UTC.
    let day_start = local_midnight(tz, today)?;
    let day_end = local_midnight(tz, today + Duration::days(1))?;

    let week_start_date = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let week_start = local_midnight(tz, week_start_date)?;
    let week_end = local_midnight(tz, week_start_date + Duration::days(7))?;

    let clients = state.client_repo.count_by_business(&business.id).await?;
    let staff = state.staff_repo.count_by_business(&business.id).await?;
    let services = state.service_repo.count_by_business(&business.id).await?;
    let appointments_today = state.appointment_repo.count_starting_between(&business.id, day_start, day_end).await?;
    let appointments_this_week = state.appointment_repo.count_starting_between(&business.id, week_start, week_end).await?;
    let next_appointment = state.appointment_repo.find_next_scheduled(&business.id, now).await?;

    Ok(Json(serde_json::json!({
        "clients": clients,
        "staff": staff,
        "services": services,
        "appointments_today": appointments_today,
        "appointments_this_week": appointments_this_week,
        "next_appointment": next_appointment
    })))
}

// A DST jump can remove local midnight; the day then starts an hour later.
fn local_midnight(tz: Tz, date: NaiveDate) -> Result<chrono::DateTime<Utc>, AppError> {
    availability::local_to_utc(tz, date, NaiveTime::MIN)
        .or_else(|| availability::local_to_utc(tz, date, NaiveTime::from_hms_opt(1, 0, 0).unwrap()))
        .ok_or(AppError::Internal)
}
