use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{CreateClientRequest, UpdateClientRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::client::Client;
use std::sync::Arc;
use tracing::info;

pub async fn create_client(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(business_id): Path<String>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let mut client = Client::new(business.id, payload.name, payload.email);
    client.phone = payload.phone;
    client.notes = payload.notes;

    let created = state.client_repo.create(&client).await?;

    info!("Created client: {}", created.id);

    Ok(Json(created))
}

pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(business_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let clients = state.client_repo.list_by_business(&business_id).await?;
    Ok(Json(clients))
}

pub async fn update_client(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((business_id, client_id)): Path<(String, String)>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let mut client = state.client_repo.find_by_id(&business_id, &client_id).await?
        .ok_or(AppError::NotFound("Client not found".into()))?;

    if let Some(name) = payload.name {
        client.name = name;
    }
    if let Some(email) = payload.email {
        client.email = email;
    }
    if let Some(phone) = payload.phone {
        client.phone = Some(phone);
    }
    if let Some(notes) = payload.notes {
        client.notes = Some(notes);
    }

    let updated = state.client_repo.update(&client).await?;
    Ok(Json(updated))
}

pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((business_id, client_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    state.client_repo.delete(&business_id, &client_id).await?;

    info!("Deleted client {}", client_id);

    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn client_history(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((business_id, client_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let client = state.client_repo.find_by_id(&business_id, &client_id).await?
        .ok_or(AppError::NotFound("Client not found".into()))?;

    let appointments = state.appointment_repo.list_by_client(&business_id, &client.id).await?;

    Ok(Json(serde_json::json!({
        "client": client,
        "appointments": appointments
    })))
}
