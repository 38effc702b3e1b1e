use crate::domain::{models::business::Business, ports::BusinessRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBusinessRepo {
    pool: SqlitePool,
}

impl SqliteBusinessRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessRepository for SqliteBusinessRepo {
    async fn create(&self, business: &Business) -> Result<Business, AppError> {
        sqlx::query_as::<_, Business>(
            r#"INSERT INTO businesses (id, owner_id, name, slug, timezone, working_hours_json, logo_url, plan, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
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
        sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Business>, AppError> {
        sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_for_owner(&self, owner_id: &str, id: &str) -> Result<Option<Business>, AppError> {
        sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE owner_id = ? AND id = ?")
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Business>, AppError> {
        sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE owner_id = ? ORDER BY created_at ASC")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, business: &Business) -> Result<Business, AppError> {
        sqlx::query_as::<_, Business>(
            r#"UPDATE businesses SET name = ?, timezone = ?, working_hours_json = ?, logo_url = ?, plan = ?
               WHERE id = ?
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
