use crate::domain::{models::appointment::Appointment, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    // Insert and overlap check run as one statement so two concurrent
    // requests for the same slot cannot both pass a separate pre-check.
    async fn insert_if_vacant(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            r#"INSERT INTO appointments (id, business_id, staff_id, client_id, service_id, start_time, end_time, status, notes, created_at)
               SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
               WHERE NOT EXISTS (
                   SELECT 1 FROM appointments
                   WHERE staff_id = ? AND status = 'scheduled' AND start_time < ? AND end_time > ?
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
            r#"UPDATE appointments SET staff_id = ?, start_time = ?, end_time = ?, status = ?, notes = ?
               WHERE id = ? AND business_id = ? AND NOT EXISTS (
                   SELECT 1 FROM appointments other
                   WHERE other.staff_id = ? AND other.id != ? AND other.status = 'scheduled'
                     AND other.start_time < ? AND other.end_time > ?
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
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE business_id = ? AND id = ?")
            .bind(business_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_business(&self, business_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE business_id = ? ORDER BY start_time ASC"
        )
            .bind(business_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_client(&self, business_id: &str, client_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE business_id = ? AND client_id = ? ORDER BY start_time DESC"
        )
            .bind(business_id)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_staff_between(&self, staff_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE staff_id = ? AND start_time < ? AND end_time > ? AND status = 'scheduled'"
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
               WHERE staff_id = ? AND status = 'scheduled' AND start_time < ? AND end_time > ?
                 AND (? IS NULL OR id != ?)"#
        )
            .bind(staff_id)
            .bind(end)
            .bind(start)
            .bind(exclude_id)
            .bind(exclude_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok(count)
    }

    async fn count_created_since(&self, business_id: &str, since: DateTime<Utc>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE business_id = ? AND created_at >= ?"
        )
            .bind(business_id)
            .bind(since)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok(count)
    }

    async fn count_starting_between(&self, business_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE business_id = ? AND status = 'scheduled' AND start_time >= ? AND start_time < ?"
        )
            .bind(business_id)
            .bind(start)
            .bind(end)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok(count)
    }

    async fn find_next_scheduled(&self, business_id: &str, after: DateTime<Utc>) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE business_id = ? AND status = 'scheduled' AND start_time >= ? ORDER BY start_time ASC LIMIT 1"
        )
            .bind(business_id)
            .bind(after)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            r#"UPDATE appointments SET staff_id = ?, start_time = ?, end_time = ?, status = ?, notes = ?
               WHERE id = ? AND business_id = ?
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
