use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;
use crate::domain::models::business::Business;
use crate::domain::models::subscription::Subscription;
use crate::domain::ports::{AppointmentRepository, SubscriptionRepository};
use crate::error::AppError;

pub const TRIAL_PERIOD_DAYS: i64 = 14;
pub const GRACE_PERIOD_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy)]
pub struct PlanLimits {
    pub max_staff: Option<i64>,
    pub appointments_per_month: Option<i64>,
}

const BASIC_LIMITS: PlanLimits = PlanLimits { max_staff: Some(1), appointments_per_month: Some(100) };

// Built once at startup and shared read-only through AppState.
#[derive(Clone)]
pub struct PlanPolicy {
    limits: HashMap<String, PlanLimits>,
}

impl PlanPolicy {
    pub fn standard() -> Self {
        let mut limits = HashMap::new();
        limits.insert("basic".to_string(), BASIC_LIMITS);
        limits.insert("pro".to_string(), PlanLimits { max_staff: Some(5), appointments_per_month: Some(500) });
        limits.insert("business".to_string(), PlanLimits { max_staff: None, appointments_per_month: None });
        Self { limits }
    }

    pub fn limits_for(&self, plan: &str) -> PlanLimits {
        self.limits.get(plan).copied().unwrap_or(BASIC_LIMITS)
    }

    pub fn is_known_plan(&self, plan: &str) -> bool {
        self.limits.contains_key(plan)
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct AccessDecision {
    pub can_use: bool,
    pub reason: String,
    pub plan: String,
    pub trial_days_remaining: Option<i64>,
    pub grace_days_remaining: Option<i64>,
}

impl AccessDecision {
    fn denied(reason: &str, plan: &str) -> Self {
        Self {
            can_use: false,
            reason: reason.to_string(),
            plan: plan.to_string(),
            trial_days_remaining: None,
            grace_days_remaining: None,
        }
    }

    fn allowed(reason: &str, plan: &str) -> Self {
        Self {
            can_use: true,
            reason: reason.to_string(),
            plan: plan.to_string(),
            trial_days_remaining: None,
            grace_days_remaining: None,
        }
    }
}

pub fn evaluate_access(subscription: Option<&Subscription>, now: DateTime<Utc>) -> AccessDecision {
    let Some(sub) = subscription else {
        return AccessDecision::denied("no_subscription", "basic");
    };

    match sub.status.as_str() {
        "trialing" => match sub.trial_ends_at {
            Some(ends) if now < ends => {
                let mut decision = AccessDecision::allowed("trialing", &sub.plan);
                decision.trial_days_remaining = Some((ends - now).num_days());
                decision
            }
            _ => AccessDecision::denied("trial_expired", &sub.plan),
        },
        "active" => AccessDecision::allowed("active", &sub.plan),
        "past_due" => match sub.grace_until {
            Some(until) if now < until => {
                let mut decision = AccessDecision::allowed("grace_period", &sub.plan);
                decision.grace_days_remaining = Some((until - now).num_days());
                decision
            }
            _ => AccessDecision::denied("payment_overdue", &sub.plan),
        },
        "canceled" => AccessDecision::denied("subscription_canceled", &sub.plan),
        _ => AccessDecision::denied("no_subscription", &sub.plan),
    }
}

pub fn start_trial(business_id: String) -> Subscription {
    let now = Utc::now();
    Subscription {
        id: Uuid::new_v4().to_string(),
        business_id,
        provider_customer_id: None,
        provider_subscription_id: None,
        plan: "basic".to_string(),
        status: "trialing".to_string(),
        trial_ends_at: Some(now + Duration::days(TRIAL_PERIOD_DAYS)),
        grace_until: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0).unwrap()
}

// Shared gate for authenticated and public appointment creation: a live
// subscription plus headroom under the plan's monthly cap.
pub async fn ensure_booking_allowed(
    policy: &PlanPolicy,
    subscriptions: &dyn SubscriptionRepository,
    appointments: &dyn AppointmentRepository,
    business: &Business,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let subscription = subscriptions.find_by_business(&business.id).await?;
    let access = evaluate_access(subscription.as_ref(), now);
    if !access.can_use {
        return Err(AppError::PlanLimit(format!("Subscription does not allow new bookings: {}", access.reason)));
    }

    let limits = policy.limits_for(&business.plan);
    if let Some(cap) = limits.appointments_per_month {
        let used = appointments.count_created_since(&business.id, month_start(now)).await?;
        if used >= cap {
            return Err(AppError::PlanLimit(format!(
                "Monthly appointment limit of {} reached for the {} plan", cap, business.plan
            )));
        }
    }

    Ok(())
}
