use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, Weekday};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Business {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub slug: String,
    pub timezone: String,
    pub working_hours_json: String,
    pub logo_url: Option<String>,
    pub plan: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DayHours {
    pub start: String,
    pub end: String,
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct WeekHours {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl Default for WeekHours {
    fn default() -> Self {
        let weekday = DayHours {
            start: "09:00".to_string(),
            end: "18:00".to_string(),
            enabled: true,
        };
        Self {
            monday: weekday.clone(),
            tuesday: weekday.clone(),
            wednesday: weekday.clone(),
            thursday: weekday.clone(),
            friday: weekday,
            saturday: DayHours { start: "09:00".to_string(), end: "13:00".to_string(), enabled: true },
            sunday: DayHours { start: "09:00".to_string(), end: "13:00".to_string(), enabled: false },
        }
    }
}

impl WeekHours {
    pub fn for_weekday(&self, weekday: Weekday) -> &DayHours {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }
}

impl Business {
    pub fn new(owner_id: String, name: String, slug: String, timezone: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            name,
            slug,
            timezone,
            working_hours_json: serde_json::to_string(&WeekHours::default()).unwrap_or_default(),
            logo_url: None,
            plan: "basic".to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn working_hours(&self) -> WeekHours {
        serde_json::from_str(&self.working_hours_json).unwrap_or_default()
    }
}
