use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, warn};

use super::session::token_from_headers;
use crate::{error::ApiError, state::AppState, users::repo_types::User};

/// Resolves the `sessionId` cookie to the user currently holding that session.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie_name = &state.config.session.cookie_name;
        let token = token_from_headers(&parts.headers, cookie_name).ok_or_else(|| {
            debug!("request without session cookie");
            ApiError::Unauthorized("You have to login".into())
        })?;

        match state.users.find_by_session(&token).await? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                warn!("unknown or superseded session token");
                Err(ApiError::Unauthorized("You have to login".into()))
            }
        }
    }
}
