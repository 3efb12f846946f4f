//! `AuthUser` extractor

use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::FromRef, http::request::Parts};
use uuid::Uuid;

/// Header carrying the authenticated user's id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated user taken from the gateway header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing user identity".to_string()))?;

        let user_id = Uuid::parse_str(raw.trim())
            .map_err(|_| ApiError::Unauthorized("Invalid user identity".to_string()))?;

        Ok(AuthUser { user_id })
    }
}
