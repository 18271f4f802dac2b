//! Auth extractor for protected routes
//!
//! Handlers that mutate state take an [`AuthUser`] argument; extraction
//! fails with 401 before the handler body runs, and the identity is then
//! passed explicitly into every rules-engine call.

use crate::error::ApiError;
use crate::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use memories_core::CoreError;

/// The authenticated requester.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                CoreError::NotAuthenticated("Missing Authorization header".to_string())
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            CoreError::NotAuthenticated("Invalid Authorization format".to_string())
        })?;

        let user_id = state.auth_service.validate_token(token)?;

        // The token may outlive the account; resolve it fresh
        let user = state
            .db
            .get_user_by_id(&user_id)
            .await
            .map_err(|e| CoreError::Storage(e.to_string()))?
            .ok_or_else(|| CoreError::NotAuthenticated("User not found".to_string()))?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
        })
    }
}
