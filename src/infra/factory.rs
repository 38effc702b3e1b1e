use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::services::billing::PlanPolicy;
use crate::domain::services::session_service::SessionService;
use crate::infra::payment::http_payment_provider::HttpPaymentProvider;
use crate::infra::repositories::{
    postgres_appointment_repo::PostgresAppointmentRepo, postgres_business_repo::PostgresBusinessRepo,
    postgres_client_repo::PostgresClientRepo, postgres_service_repo::PostgresServiceRepo,
    postgres_session_repo::PostgresSessionRepo, postgres_staff_repo::PostgresStaffRepo,
    postgres_subscription_repo::PostgresSubscriptionRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_appointment_repo::SqliteAppointmentRepo, sqlite_business_repo::SqliteBusinessRepo,
    sqlite_client_repo::SqliteClientRepo, sqlite_service_repo::SqliteServiceRepo,
    sqlite_session_repo::SqliteSessionRepo, sqlite_staff_repo::SqliteStaffRepo,
    sqlite_subscription_repo::SqliteSubscriptionRepo, sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let payment_provider = Arc::new(HttpPaymentProvider::new(
        config.payment_api_url.clone(),
        config.payment_api_key.clone(),
    ));

    let plan_policy = PlanPolicy::standard();

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let session_repo = Arc::new(PostgresSessionRepo::new(pool.clone()));
        let session_service = Arc::new(SessionService::new(session_repo.clone()));

        AppState {
            config: config.clone(),
            plan_policy,
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            session_repo,
            business_repo: Arc::new(PostgresBusinessRepo::new(pool.clone())),
            staff_repo: Arc::new(PostgresStaffRepo::new(pool.clone())),
            service_repo: Arc::new(PostgresServiceRepo::new(pool.clone())),
            client_repo: Arc::new(PostgresClientRepo::new(pool.clone())),
            appointment_repo: Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            subscription_repo: Arc::new(PostgresSubscriptionRepo::new(pool.clone())),
            session_service,
            payment_provider,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let session_repo = Arc::new(SqliteSessionRepo::new(pool.clone()));
        let session_service = Arc::new(SessionService::new(session_repo.clone()));

        AppState {
            config: config.clone(),
            plan_policy,
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            session_repo,
            business_repo: Arc::new(SqliteBusinessRepo::new(pool.clone())),
            staff_repo: Arc::new(SqliteStaffRepo::new(pool.clone())),
            service_repo: Arc::new(SqliteServiceRepo::new(pool.clone())),
            client_repo: Arc::new(SqliteClientRepo::new(pool.clone())),
            appointment_repo: Arc::new(SqliteAppointmentRepo::new(pool.clone())),
            subscription_repo: Arc::new(SqliteSubscriptionRepo::new(pool.clone())),
            session_service,
            payment_provider,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
