use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{CreateBusinessRequest, UpdateBusinessRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::business::Business;
use crate::domain::services::billing;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;

pub async fn create_business(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateBusinessRequest>,
) -> Result<impl IntoResponse, AppError> {
    let timezone = payload.timezone.unwrap_or_else(|| "America/Sao_Paulo".to_string());
    if timezone.parse::<Tz>().is_err() {
        return Err(AppError::Validation("Unknown timezone identifier".into()));
    }

    let mut business = Business::new(user.id, payload.name, payload.slug, timezone);
    business.logo_url = payload.logo_url;

    let created = state.business_repo.create(&business).await?;

    // Every new business starts on a basic-plan trial.
    let trial = billing::start_trial(created.id.clone());
    state.subscription_repo.create(&trial).await?;

    info!("Created business: {} ({})", created.name, created.id);

    Ok(Json(created))
}

pub async fn list_businesses(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let businesses = state.business_repo.list_by_owner(&user.id).await?;
    Ok(Json(businesses))
}

pub async fn get_business(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(business_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    Ok(Json(business))
}

pub async fn update_business(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(business_id): Path<String>,
    Json(payload): Json<UpdateBusinessRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut business = state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    if let Some(name) = payload.name {
        business.name = name;
    }
    if let Some(timezone) = payload.timezone {
        if timezone.parse::<Tz>().is_err() {
            return Err(AppError::Validation("Unknown timezone identifier".into()));
        }
        business.timezone = timezone;
    }
    if let Some(logo_url) = payload.logo_url {
        business.logo_url = Some(logo_url);
    }
    if let Some(hours) = payload.working_hours {
        business.working_hours_json = serde_json::to_string(&hours)
            .map_err(|_| AppError::Validation("Invalid working hours".into()))?;
    }

    let updated = state.business_repo.update(&business).await?;
    Ok(Json(updated))
}
