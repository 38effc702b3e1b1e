use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::domain::models::user::User;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

pub struct AuthUser(pub User);

fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(cookies) = parts.extensions.get::<Cookies>()
        && let Some(cookie) = cookies.get("session_token")
    {
        return Some(cookie.value().to_string());
    }

    parts.headers.get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts).ok_or(StatusCode::UNAUTHORIZED)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let session = app_state.session_service.resolve(&token)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let user = app_state.user_repo.find_by_id(&session.user_id)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Span::current().record("user_id", &user.id);

        Ok(AuthUser(user))
    }
}
