use crate::domain::{models::subscription::Subscription, ports::SubscriptionRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresSubscriptionRepo {
    pool: PgPool,
}

impl PostgresSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepo {
    async fn create(&self, subscription: &Subscription) -> Result<Subscription, AppError> {
        sqlx::query_as::<_, Subscription>(
            r#"INSERT INTO subscriptions (id, business_id, provider_customer_id, provider_subscription_id, plan, status, trial_ends_at, grace_until, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING *"#
        )
            .bind(&subscription.id)
            .bind(&subscription.business_id)
            .bind(&subscription.provider_customer_id)
            .bind(&subscription.provider_subscription_id)
            .bind(&subscription.plan)
            .bind(&subscription.status)
            .bind(subscription.trial_ends_at)
            .bind(subscription.grace_until)
            .bind(subscription.created_at)
            .bind(subscription.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_business(&self, business_id: &str) -> Result<Option<Subscription>, AppError> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE business_id = $1")
            .bind(business_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_provider_subscription(&self, provider_subscription_id: &str) -> Result<Option<Subscription>, AppError> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE provider_subscription_id = $1")
            .bind(provider_subscription_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, subscription: &Subscription) -> Result<Subscription, AppError> {
        sqlx::query_as::<_, Subscription>(
            r#"UPDATE subscriptions SET provider_customer_id = $1, provider_subscription_id = $2, plan = $3, status = $4, trial_ends_at = $5, grace_until = $6, updated_at = $7
               WHERE id = $8
               RETURNING *"#
        )
            .bind(&subscription.provider_customer_id)
            .bind(&subscription.provider_subscription_id)
            .bind(&subscription.plan)
            .bind(&subscription.status)
            .bind(subscription.trial_ends_at)
            .bind(subscription.grace_until)
            .bind(subscription.updated_at)
            .bind(&subscription.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
