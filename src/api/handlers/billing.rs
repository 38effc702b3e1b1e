use axum::{extract::{Path, State}, http::HeaderMap, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::SubscribeRequest;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::subscription::Subscription;
use crate::domain::services::billing::{self, GRACE_PERIOD_DAYS};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(business_id): Path<String>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut business = state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    if !state.plan_policy.is_known_plan(&payload.plan) {
        return Err(AppError::Validation("Unknown plan".into()));
    }

    let customer_id = state.payment_provider.create_customer(&business.name, &user.email).await?;
    let provider_subscription_id = state.payment_provider.create_subscription(&customer_id, &payload.plan).await?;

    let now = Utc::now();
    let subscription = match state.subscription_repo.find_by_business(&business.id).await? {
        Some(mut sub) => {
            sub.provider_customer_id = Some(customer_id);
            sub.provider_subscription_id = Some(provider_subscription_id);
            sub.plan = payload.plan.clone();
            sub.status = "active".to_string();
            sub.trial_ends_at = None;
            sub.grace_until = None;
            sub.updated_at = now;
            state.subscription_repo.update(&sub).await?
        }
        None => {
            let sub = Subscription {
                id: Uuid::new_v4().to_string(),
                business_id: business.id.clone(),
                provider_customer_id: Some(customer_id),
                provider_subscription_id: Some(provider_subscription_id),
                plan: payload.plan.clone(),
                status: "active".to_string(),
                trial_ends_at: None,
                grace_until: None,
                created_at: now,
                updated_at: now,
            };
            state.subscription_repo.create(&sub).await?
        }
    };

    business.plan = payload.plan;
    state.business_repo.update(&business).await?;

    info!("Business {} subscribed to plan {}", business.id, subscription.plan);

    Ok(Json(subscription))
}

pub async fn subscription_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(business_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_for_owner(&user.id, &business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let subscription = state.subscription_repo.find_by_business(&business.id).await?;
    let access = billing::evaluate_access(subscription.as_ref(), Utc::now());
    let limits = state.plan_policy.limits_for(&business.plan);

    Ok(Json(json!({
        "subscription": subscription,
        "access": access,
        "limits": {
            "max_staff": limits.max_staff,
            "appointments_per_month": limits.appointments_per_month
        }
    })))
}

pub async fn payment_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let received = headers.get("X-Webhook-Token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !webhook_token_matches(received, &state.config.webhook_token) {
        warn!("Webhook rejected: bad token");
        return Err(AppError::Unauthorized);
    }

    let event = payload["event"].as_str().unwrap_or_default().to_string();

    let Some(provider_subscription_id) = payload["payment"]["subscription"].as_str() else {
        warn!("Webhook {} carried no subscription reference", event);
        return Ok(Json(json!({"received": true})));
    };

    let Some(mut subscription) = state.subscription_repo
        .find_by_provider_subscription(provider_subscription_id)
        .await?
    else {
        warn!("Webhook {} for unknown subscription {}", event, provider_subscription_id);
        return Ok(Json(json!({"received": true})));
    };

    let now = Utc::now();
    match event.as_str() {
        "PAYMENT_CONFIRMED" | "PAYMENT_RECEIVED" => {
            subscription.status = "active".to_string();
            subscription.grace_until = None;
        }
        "PAYMENT_OVERDUE" => {
            subscription.status = "past_due".to_string();
            subscription.grace_until = Some(now + Duration::days(GRACE_PERIOD_DAYS));
        }
        "PAYMENT_REFUNDED" | "PAYMENT_DELETED" => {
            subscription.status = "canceled".to_string();
        }
        _ => {
            warn!("Unhandled webhook event: {}", event);
            return Ok(Json(json!({"received": true})));
        }
    }

    subscription.updated_at = now;
    state.subscription_repo.update(&subscription).await?;

    info!("Webhook {} applied to subscription {}", event, subscription.id);

    Ok(Json(json!({"received": true})))
}

fn webhook_token_matches(received: &str, expected: &str) -> bool {
    let digest = |value: &str| {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        hasher.finalize()
    };

    digest(received) == digest(expected)
}
