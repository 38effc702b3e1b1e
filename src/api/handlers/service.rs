use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{CreateServiceRequest, UpdateServiceRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::service::Service;
use std::sync::Arc;
use tracing::info;

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(business_id): Path<String>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    if payload.duration_min <= 0 {
        return Err(AppError::Validation("Service duration must be positive".into()));
    }

    let mut service = Service::new(business.id, payload.name, payload.duration_min, payload.price);
    service.description = payload.description;

    let created = state.service_repo.create(&service).await?;

    info!("Created service: {}", created.id);

    Ok(Json(created))
}

pub async fn list_services(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(business_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let services = state.service_repo.list_by_business(&business_id).await?;
    Ok(Json(services))
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((business_id, service_id)): Path<(String, String)>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let mut service = state.service_repo.find_by_id(&business_id, &service_id).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    if let Some(name) = payload.name {
        service.name = name;
    }
    if let Some(description) = payload.description {
        service.description = Some(description);
    }
    if let Some(duration_min) = payload.duration_min {
        if duration_min <= 0 {
            return Err(AppError::Validation("Service duration must be positive".into()));
        }
        service.duration_min = duration_min;
    }
    if let Some(price) = payload.price {
        service.price = price;
    }
    if let Some(is_active) = payload.is_active {
        service.is_active = is_active;
    }

    let updated = state.service_repo.update(&service).await?;
    Ok(Json(updated))
}
