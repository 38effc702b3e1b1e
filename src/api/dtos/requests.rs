use crate::domain::models::business::WeekHours;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateBusinessRequest {
    pub name: String,
    pub slug: String,
    pub timezone: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBusinessRequest {
    pub name: Option<String>,
    pub timezone: Option<String>,
    pub logo_url: Option<String>,
    pub working_hours: Option<WeekHours>,
}

#[derive(Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub duration_min: i32,
    pub price: f64,
}

#[derive(Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_min: Option<i32>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub staff_id: String,
    pub client_id: String,
    pub service_id: String,
    pub date: String,
    pub time: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateAppointmentRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub staff_id: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct AppointmentListQuery {
    pub staff_id: Option<String>,
    pub client_id: Option<String>,
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Deserialize)]
pub struct PublicBookingRequest {
    pub staff_id: String,
    pub service_id: String,
    pub date: String,
    pub time: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct SubscribeRequest {
    pub plan: String,
}
