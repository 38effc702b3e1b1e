use corella_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_appointment_repo::SqliteAppointmentRepo,
        sqlite_business_repo::SqliteBusinessRepo,
        sqlite_client_repo::SqliteClientRepo,
        sqlite_service_repo::SqliteServiceRepo,
        sqlite_session_repo::SqliteSessionRepo,
        sqlite_staff_repo::SqliteStaffRepo,
        sqlite_subscription_repo::SqliteSubscriptionRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    domain::ports::PaymentProvider,
    domain::services::billing::PlanPolicy,
    domain::services::session_service::SessionService,
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use std::str::FromStr;
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::Value;

pub struct MockPaymentProvider;

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_customer(&self, _name: &str, _email: &str) -> Result<String, AppError> {
        Ok(format!("cus_{}", Uuid::new_v4()))
    }

    async fn create_subscription(&self, _customer_id: &str, plan: &str) -> Result<String, AppError> {
        Ok(format!("sub_mock_{}", plan))
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            payment_api_url: "http://localhost".to_string(),
            payment_api_key: "test-key".to_string(),
            webhook_token: "test-webhook-token".to_string(),
        };

        let session_repo = Arc::new(SqliteSessionRepo::new(pool.clone()));
        let session_service = Arc::new(SessionService::new(session_repo.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            plan_policy: PlanPolicy::standard(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            session_repo,
            business_repo: Arc::new(SqliteBusinessRepo::new(pool.clone())),
            staff_repo: Arc::new(SqliteStaffRepo::new(pool.clone())),
            service_repo: Arc::new(SqliteServiceRepo::new(pool.clone())),
            client_repo: Arc::new(SqliteClientRepo::new(pool.clone())),
            appointment_repo: Arc::new(SqliteAppointmentRepo::new(pool.clone())),
            subscription_repo: Arc::new(SqliteSubscriptionRepo::new(pool.clone())),
            session_service,
            payment_provider: Arc::new(MockPaymentProvider),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    // Registers a fresh account and returns its bearer token.
    pub async fn register_and_login(&self, email: &str) -> String {
        let payload = serde_json::json!({
            "email": email,
            "name": "Test User",
            "password": "password123"
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Register failed in test helper: status {}", response.status());
        }

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        body_json["token"].as_str().expect("No token in register response").to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
