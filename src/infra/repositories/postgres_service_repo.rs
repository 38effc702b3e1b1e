use crate::domain::{models::service::Service, ports::ServiceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresServiceRepo {
    pool: PgPool,
}

impl PostgresServiceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for PostgresServiceRepo {
    async fn create(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            r#"INSERT INTO services (id, business_id, name, description, duration_min, price, is_active, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#
        )
            .bind(&service.id)
            .bind(&service.business_id)
            .bind(&service.name)
            .bind(&service.description)
            .bind(service.duration_min)
            .bind(service.price)
            .bind(service.is_active)
            .bind(service.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Service>, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE business_id = $1 AND id = $2")
            .bind(business_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_business(&self, business_id: &str) -> Result<Vec<Service>, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE business_id = $1 ORDER BY name ASC")
            .bind(business_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            r#"UPDATE services SET name = $1, description = $2, duration_min = $3, price = $4, is_active = $5
               WHERE business_id = $6 AND id = $7
               RETURNING *"#
        )
            .bind(&service.name)
            .bind(&service.description)
            .bind(service.duration_min)
            .bind(service.price)
            .bind(service.is_active)
            .bind(&service.business_id)
            .bind(&service.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_business(&self, business_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM services WHERE business_id = $1 AND is_active = TRUE"
        )
            .bind(business_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok(count)
    }
}
