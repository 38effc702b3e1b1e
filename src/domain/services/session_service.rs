use std::sync::Arc;
use crate::domain::models::{session::UserSession, user::User};
use crate::domain::ports::SessionRepository;
use crate::error::AppError;
use chrono::{Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

pub const SESSION_TTL_DAYS: i64 = 7;

pub struct SessionService {
    repo: Arc<dyn SessionRepository>,
}

impl SessionService {
    pub fn new(repo: Arc<dyn SessionRepository>) -> Self {
        Self { repo }
    }

    // Only the sha256 digest of the token is persisted; the raw value exists
    // client-side alone.
    pub async fn issue(&self, user: &User) -> Result<String, AppError> {
        let token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect();
        let now = Utc::now();

        let session = UserSession {
            token_hash: self.hash_token(&token),
            user_id: user.id.clone(),
            expires_at: now + Duration::days(SESSION_TTL_DAYS),
            created_at: now,
        };

        self.repo.create(&session).await?;
        Ok(token)
    }

    pub async fn resolve(&self, raw_token: &str) -> Result<Option<UserSession>, AppError> {
        let token_hash = self.hash_token(raw_token);

        let Some(session) = self.repo.find_by_hash(&token_hash).await? else {
            return Ok(None);
        };

        if session.expires_at < Utc::now() {
            self.repo.delete(&token_hash).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub async fn revoke(&self, raw_token: &str) -> Result<(), AppError> {
        self.repo.delete(&self.hash_token(raw_token)).await
    }

    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
