use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Service {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_min: i32,
    pub price: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Service {
    pub fn new(business_id: String, name: String, duration_min: i32, price: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id,
            name,
            description: None,
            duration_min,
            price,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
