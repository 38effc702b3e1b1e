use std::sync::Arc;
use crate::domain::ports::{
    AppointmentRepository, BusinessRepository, ClientRepository, PaymentProvider,
    ServiceRepository, SessionRepository, StaffRepository, SubscriptionRepository,
    UserRepository,
};
use crate::domain::services::billing::PlanPolicy;
use crate::domain::services::session_service::SessionService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub plan_policy: PlanPolicy,
    pub user_repo: Arc<dyn UserRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub business_repo: Arc<dyn BusinessRepository>,
    pub staff_repo: Arc<dyn StaffRepository>,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub client_repo: Arc<dyn ClientRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub subscription_repo: Arc<dyn SubscriptionRepository>,
    pub session_service: Arc<SessionService>,
    pub payment_provider: Arc<dyn PaymentProvider>,
}
