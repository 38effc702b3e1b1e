use crate::domain::{models::staff::Staff, ports::StaffRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresStaffRepo {
    pool: PgPool,
}

impl PostgresStaffRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffRepository for PostgresStaffRepo {
    async fn create(&self, staff: &Staff) -> Result<Staff, AppError> {
        sqlx::query_as::<_, Staff>(
            r#"INSERT INTO staff (id, business_id, name, email, phone, role, is_active, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#
        )
            .bind(&staff.id)
            .bind(&staff.business_id)
            .bind(&staff.name)
            .bind(&staff.email)
            .bind(&staff.phone)
            .bind(&staff.role)
            .bind(staff.is_active)
            .bind(staff.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Staff>, AppError> {
        sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE business_id = $1 AND id = $2")
            .bind(business_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_business(&self, business_id: &str) -> Result<Vec<Staff>, AppError> {
        sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE business_id = $1 ORDER BY name ASC")
            .bind(business_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, staff: &Staff) -> Result<Staff, AppError> {
        sqlx::query_as::<_, Staff>(
            r#"UPDATE staff SET name = $1, email = $2, phone = $3, role = $4, is_active = $5
               WHERE business_id = $6 AND id = $7
               RETURNING *"#
        )
            .bind(&staff.name)
            .bind(&staff.email)
            .bind(&staff.phone)
            .bind(&staff.role)
            .bind(staff.is_active)
            .bind(&staff.business_id)
            .bind(&staff.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_business(&self, business_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM staff WHERE business_id = $1 AND is_active = TRUE"
        )
            .bind(business_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok(count)
    }
}
