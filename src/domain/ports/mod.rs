use crate::domain::models::{
    appointment::Appointment, business::Business, client::Client, service::Service,
    session::UserSession, staff::Staff, subscription::Subscription, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &UserSession) -> Result<(), AppError>;
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<UserSession>, AppError>;
    async fn delete(&self, token_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BusinessRepository: Send + Sync {
    async fn create(&self, business: &Business) -> Result<Business, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Business>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Business>, AppError>;
    async fn find_for_owner(&self, owner_id: &str, id: &str) -> Result<Option<Business>, AppError>;
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Business>, AppError>;
    async fn update(&self, business: &Business) -> Result<Business, AppError>;
}

#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn create(&self, staff: &Staff) -> Result<Staff, AppError>;
    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Staff>, AppError>;
    async fn list_by_business(&self, business_id: &str) -> Result<Vec<Staff>, AppError>;
    async fn update(&self, staff: &Staff) -> Result<Staff, AppError>;
    async fn count_by_business(&self, business_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, service: &Service) -> Result<Service, AppError>;
    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Service>, AppError>;
    async fn list_by_business(&self, business_id: &str) -> Result<Vec<Service>, AppError>;
    async fn update(&self, service: &Service) -> Result<Service, AppError>;
    async fn count_by_business(&self, business_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn create(&self, client: &Client) -> Result<Client, AppError>;
    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Client>, AppError>;
    async fn find_by_email(&self, business_id: &str, email: &str) -> Result<Option<Client>, AppError>;
    async fn list_by_business(&self, business_id: &str) -> Result<Vec<Client>, AppError>;
    async fn update(&self, client: &Client) -> Result<Client, AppError>;
    async fn delete(&self, business_id: &str, id: &str) -> Result<(), AppError>;
    async fn count_by_business(&self, business_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn insert_if_vacant(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn reschedule_if_vacant(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn list_by_business(&self, business_id: &str) -> Result<Vec<Appointment>, AppError>;
    async fn list_by_client(&self, business_id: &str, client_id: &str) -> Result<Vec<Appointment>, AppError>;
    async fn list_for_staff_between(&self, staff_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError>;
    async fn count_overlapping(&self, staff_id: &str, start: DateTime<Utc>, end: DateTime<Utc>, exclude_id: Option<&str>) -> Result<i64, AppError>;
    async fn count_created_since(&self, business_id: &str, since: DateTime<Utc>) -> Result<i64, AppError>;
    async fn count_starting_between(&self, business_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, AppError>;
    async fn find_next_scheduled(&self, business_id: &str, after: DateTime<Utc>) -> Result<Option<Appointment>, AppError>;
    async fn update(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, subscription: &Subscription) -> Result<Subscription, AppError>;
    async fn find_by_business(&self, business_id: &str) -> Result<Option<Subscription>, AppError>;
    async fn find_by_provider_subscription(&self, provider_subscription_id: &str) -> Result<Option<Subscription>, AppError>;
    async fn update(&self, subscription: &Subscription) -> Result<Subscription, AppError>;
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_customer(&self, name: &str, email: &str) -> Result<String, AppError>;
    async fn create_subscription(&self, customer_id: &str, plan: &str) -> Result<String, AppError>;
}
