use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{CreateStaffRequest, UpdateStaffRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::staff::Staff;
use std::sync::Arc;
use tracing::info;

pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(business_id): Path<String>,
    Json(payload): Json<CreateStaffRequest>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let limits = state.plan_policy.limits_for(&business.plan);
    if let Some(max_staff) = limits.max_staff {
        let current = state.staff_repo.count_by_business(&business.id).await?;
        if current >= max_staff {
            return Err(AppError::PlanLimit(format!(
                "Plan '{}' allows at most {} staff members", business.plan, max_staff
            )));
        }
    }

    let mut staff = Staff::new(business.id, payload.name);
    staff.email = payload.email;
    staff.phone = payload.phone;
    staff.role = payload.role;

    let created = state.staff_repo.create(&staff).await?;

    info!("Created staff member: {}", created.id);

    Ok(Json(created))
}

pub async fn list_staff(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(business_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let staff = state.staff_repo.list_by_business(&business_id).await?;
    Ok(Json(staff))
}

pub async fn get_staff(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((business_id, staff_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let staff = state.staff_repo.find_by_id(&business_id, &staff_id).await?
        .ok_or(AppError::NotFound("Staff member not found".into()))?;

    Ok(Json(staff))
}

pub async fn update_staff(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((business_id, staff_id)): Path<(String, String)>,
    Json(payload): Json<UpdateStaffRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let mut staff = state.staff_repo.find_by_id(&business_id, &staff_id).await?
        .ok_or(AppError::NotFound("Staff member not found".into()))?;

    if let Some(name) = payload.name {
        staff.name = name;
    }
    if let Some(email) = payload.email {
        staff.email = Some(email);
    }
    if let Some(phone) = payload.phone {
        staff.phone = Some(phone);
    }
    if let Some(role) = payload.role {
        staff.role = Some(role);
    }
    if let Some(is_active) = payload.is_active {
        staff.is_active = is_active;
    }

    let updated = state.staff_repo.update(&staff).await?;
    Ok(Json(updated))
}
