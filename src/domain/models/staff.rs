use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Staff {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Staff {
    pub fn new(business_id: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            business_id,
            name,
            email: None,
            phone: None,
            role: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
