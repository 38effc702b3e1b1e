use crate::domain::ports::PaymentProvider;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

pub struct HttpPaymentProvider {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpPaymentProvider {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }

    async fn post_json(&self, path: &str, payload: &impl Serialize) -> Result<Value, AppError> {
        let res = self.client.post(format!("{}/{}", self.api_url, path))
            .header("access_token", &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Payment provider connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Payment provider request failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        res.json::<Value>().await.map_err(|e| {
            let msg = format!("Payment provider returned invalid JSON: {}", e);
            error!("{}", msg);
            AppError::InternalWithMsg(msg)
        })
    }
}

#[derive(Serialize)]
struct CustomerPayload {
    name: String,
    email: String,
}

#[derive(Serialize)]
struct SubscriptionPayload {
    customer: String,
    plan: String,
    cycle: String,
    description: String,
}

#[async_trait]
impl PaymentProvider for HttpPaymentProvider {
    async fn create_customer(&self, name: &str, email: &str) -> Result<String, AppError> {
        let payload = CustomerPayload {
            name: name.to_string(),
            email: email.to_string(),
        };

        let body = self.post_json("customers", &payload).await?;
        body["id"].as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::InternalWithMsg("Payment provider response missing customer id".into()))
    }

    async fn create_subscription(&self, customer_id: &str, plan: &str) -> Result<String, AppError> {
        let payload = SubscriptionPayload {
            customer: customer_id.to_string(),
            plan: plan.to_string(),
            cycle: "MONTHLY".to_string(),
            description: format!("Corella {} plan", plan),
        };

        let body = self.post_json("subscriptions", &payload).await?;
        body["id"].as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::InternalWithMsg("Payment provider response missing subscription id".into()))
    }
}
