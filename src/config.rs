use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub payment_api_url: String,
    pub payment_api_key: String,
    pub webhook_token: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            payment_api_url: env::var("PAYMENT_API_URL").unwrap_or_else(|_| "https://sandbox.asaas.com/api/v3".to_string()),
            payment_api_key: env::var("PAYMENT_API_KEY").unwrap_or_else(|_| "test-key".to_string()),
            webhook_token: env::var("WEBHOOK_TOKEN").unwrap_or_else(|_| "dev-webhook-token".to_string()),
        }
    }
}
