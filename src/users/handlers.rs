use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        password::{hash_password, verify_password},
        session::{issue, new_token},
        AuthUser,
    },
    error::ApiError,
    state::AppState,
    users::{
        dto::{
            normalize_email, LoginRequest, MessageResponse, PublicUser, RegisterRequest,
            UsersResponse,
        },
        repo::CreateUserError,
        repo_types::NewUser,
    },
    validation::Issues,
};

const MIN_PASSWORD_LEN: usize = 6;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(register))
        .route("/users/sessions", post(login))
}

#[instrument(skip(state, _caller))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(UsersResponse {
        users: users.into_iter().map(PublicUser::from).collect(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(mut payload) = payload?;
    payload.email = normalize_email(&payload.email);

    let mut issues = Issues::new();
    issues.non_empty("name", &payload.name);
    issues.min_len("password", &payload.password, MIN_PASSWORD_LEN);
    issues.email("email", &payload.email);
    issues.finish()?;

    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already in use".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let token = new_token();
    let user = state
        .users
        .create(NewUser {
            name: payload.name.trim().to_string(),
            email: payload.email,
            password_hash,
            session_id: token.clone(),
        })
        .await
        .map_err(|e| match e {
            CreateUserError::EmailTaken => {
                warn!("email claimed concurrently");
                ApiError::Conflict("Email already in use".into())
            }
            CreateUserError::Other(e) => ApiError::Internal(e),
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        issue(&state.config.session, &token),
        Json(MessageResponse { message: "Success" }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(mut payload) = payload?;
    payload.email = normalize_email(&payload.email);

    let mut issues = Issues::new();
    issues.email("email", &payload.email);
    issues.non_empty("password", &payload.password);
    issues.finish()?;

    let Some(user) = state.users.find_by_email(&payload.email).await? else {
        warn!(email = %payload.email, "login unknown email");
        return Err(ApiError::NotFound("User not found".into()));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized(
            "Incorrect email/password combination.".into(),
        ));
    }

    let token = new_token();
    state.users.rotate_session(user.id, &token).await?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        StatusCode::CREATED,
        issue(&state.config.session, &token),
        Json(MessageResponse { message: "Success" }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo_types::User;

    #[test]
    fn public_user_hides_credentials() {
        let user = User {
            id: uuid::Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            session_id: "tok".into(),
            created_at: time::OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(json.contains("ana@example.com"));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("tok"));
    }
}
