pub mod sqlite_appointment_repo;
pub mod sqlite_business_repo;
pub mod sqlite_client_repo;
pub mod sqlite_service_repo;
pub mod sqlite_session_repo;
pub mod sqlite_staff_repo;
pub mod sqlite_subscription_repo;
pub mod sqlite_user_repo;

pub mod postgres_appointment_repo;
pub mod postgres_business_repo;
pub mod postgres_client_repo;
pub mod postgres_service_repo;
pub mod postgres_session_repo;
pub mod postgres_staff_repo;
pub mod postgres_subscription_repo;
pub mod postgres_user_repo;
