use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub business_id: String,
    pub staff_id: String,
    pub client_id: String,
    pub service_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub business_id: String,
    pub staff_id: String,
    pub client_id: String,
    pub service_id: String,
    pub start: DateTime<Utc>,
    pub duration_min: i32,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        let end_time = params.start + chrono::Duration::minutes(params.duration_min as i64);

        Self {
            id: Uuid::new_v4().to_string(),
            business_id: params.business_id,
            staff_id: params.staff_id,
            client_id: params.client_id,
            service_id: params.service_id,
            start_time: params.start,
            end_time,
            status: "scheduled".to_string(),
            notes: params.notes,
            created_at: Utc::now(),
        }
    }
}
