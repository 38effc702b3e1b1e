use crate::domain::{models::appointment::Appointment, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepo {
    // Insert and overlap check run as one statement so two concurrent
    // requests for the same slot cannot both pass a separate pre-check.
    async fn insert_if_vacant(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            r#"INSERT INTO appointments (id, business_id, staff_id, client_id, service_id, start_time, end_time, status, notes, created_at)
               SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10
               WHERE NOT EXISTS (
                   SELECT 1 FROM appointments
                   WHERE staff_id = $11 AND status = 'scheduled' AND start_time < $12 AND end_time > $13
               )
               RETURNING *"#
        )
            .bind(&appointment.id)
            .bind(&appointment.business_id)
            .bind(&appointment.staff_id)
            .bind(&appointment.client_id)
            .bind(&appointment.service_id)
            .bind(appointment.start_time)
            .bind(appointment.end_time)
            .bind(&appointment.status)
            .bind(&appointment.notes)
            .bind(appointment.created_at)
            .bind(&appointment.staff_id)
            .bind(appointment.end_time)
            .bind(appointment.start_time)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Time slot is already booked".into()))
    }

    async fn reschedule_if_vacant(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            r#"UPDATE appointments SET staff_id = $1, start_time = $2, end_time = $3, status = $4, notes = $5
               WHERE id = $6 AND business_id = $7 AND NOT EXISTS (
                   SELECT 1 FROM appointments other
                   WHERE other.staff_id = $8 AND other.id != $9 AND other.status = 'scheduled'
                     AND other.start_time < $10 AND other.end_time > $11
               )
               RETURNING *"#
        )
            .bind(&appointment.staff_id)
            .bind(appointment.start_time)
            .bind(appointment.end_time)
            .bind(&appointment.status)
            .bind(&appointment.notes)
            .bind(&appointment.id)
            .bind(&appointment.business_id)
            .bind(&appointment.staff_id)
            .bind(&appointment.id)
            .bind(appointment.end_time)
            .bind(appointment.start_time)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Target time slot is already booked".into()))
    }

    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE business_id = $1 AND id = $2")
            .bind(business_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_business(&self, business_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE business_id = $1 ORDER BY start_time ASC"
        )
            .bind(business_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_client(&self, business_id: &str, client_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE business_id = $1 AND client_id = $2 ORDER BY start_time DESC"
        )
            .bind(business_id)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_staff_between(&self, staff_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE staff_id = $1 AND start_time < $2 AND end_time > $3 AND status = 'scheduled'"
        )
            .bind(staff_id)
            .bind(end)
            .bind(start)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_overlapping(&self, staff_id: &str, start: DateTime<Utc>, end: DateTime<Utc>, exclude_id: Option<&str>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM appointments
               WHERE staff_id = $1 AND status = 'scheduled' AND start_time < $2 AND end_time > $3
                 AND ($4::TEXT IS NULL OR id != $4)"#
        )
            .bind(staff_id)
            .bind(end)
            .bind(start)
            .bind(exclude_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok(count)
    }

    async fn count_created_since(&self, business_id: &str, since: DateTime<Utc>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE business_id = $1 AND created_at >= $2"
        )
            .bind(business_id)
            .bind(since)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok(count)
    }

    async fn count_starting_between(&self, business_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE business_id = $1 AND status = 'scheduled' AND start_time >= $2 AND start_time < $3"
        )
            .bind(business_id)
            .bind(start)
            .bind(end)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok(count)
    }

    async fn find_next_scheduled(&self, business_id: &str, after: DateTime<Utc>) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE business_id = $1 AND status = 'scheduled' AND start_time >= $2 ORDER BY start_time ASC LIMIT 1"
        )
            .bind(business_id)
            .bind(after)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            r#"UPDATE appointments SET staff_id = $1, start_time = $2, end_time = $3, status = $4, notes = $5
               WHERE id = $6 AND business_id = $7
               RETURNING *"#
        )
            .bind(&appointment.staff_id)
            .bind(appointment.start_time)
            .bind(appointment.end_time)
            .bind(&appointment.status)
            .bind(&appointment.notes)
            .bind(&appointment.id)
            .bind(&appointment.business_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
