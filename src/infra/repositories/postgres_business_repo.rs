use crate::domain::{models::business::Business, ports::BusinessRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresBusinessRepo {
    pool: PgPool,
}

impl PostgresBusinessRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessRepository for PostgresBusinessRepo {
    async fn create(&self, business: &Business) -> Result<Business, AppError> {
        sqlx::query_as::<_, Business>(
            r#"INSERT INTO businesses (id, owner_id, name, slug, timezone, working_hours_json, logo_url, plan, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING *"#
        )
            .bind(&business.id)
            .bind(&business.owner_id)
            .bind(&business.name)
            .bind(&business.slug)
            .bind(&business.timezone)
            .bind(&business.working_hours_json)
            .bind(&business.logo_url)
            .bind(&business.plan)
            .bind(business.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Business>, AppError> {
        sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Business>, AppError> {
        sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_for_owner(&self, owner_id: &str, id: &str) -> Result<Option<Business>, AppError> {
        sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE owner_id = $1 AND id = $2")
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Business>, AppError> {
        sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE owner_id = $1 ORDER BY created_at ASC")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, business: &Business) -> Result<Business, AppError> {
        sqlx::query_as::<_, Business>(
            r#"UPDATE businesses SET name = $1, timezone = $2, working_hours_json = $3, logo_url = $4, plan = $5
               WHERE id = $6
               RETURNING *"#
        )
            .bind(&business.name)
            .bind(&business.timezone)
            .bind(&business.working_hours_json)
            .bind(&business.logo_url)
            .bind(&business.plan)
            .bind(&business.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
