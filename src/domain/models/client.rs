use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Client {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(business_id: String, name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id,
            name,
            email,
            phone: None,
            notes: None,
            created_at: Utc::now(),
        }
    }
}
