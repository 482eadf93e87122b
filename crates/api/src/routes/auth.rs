//! Authentication routes: registration, login, and token refresh.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{LoginRequest, RegisterRequest, TokensResponse, UserResponse};
use persistence::entities::UserEntity;
use persistence::repositories::UserRepository;
use serde::{Deserialize, Serialize};
use shared::jwt;
use shared::password;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth;

/// Response body for registration and login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokensResponse,
}

/// Request body for token refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub(crate) fn user_response(user: &UserEntity) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        job_title: user.job_title.clone(),
        company: user.company.clone(),
    }
}

fn issue_tokens(state: &AppState, user_id: uuid::Uuid) -> Result<TokensResponse, ApiError> {
    let jwt_config = UserAuth::create_jwt_config(&state.config.jwt).map_err(ApiError::Internal)?;

    let (access_token, _) = jwt_config
        .generate_access_token(user_id)
        .map_err(|e| ApiError::Internal(format!("Token error: {}", e)))?;
    let (refresh_token, _) = jwt_config
        .generate_refresh_token(user_id)
        .map_err(|e| ApiError::Internal(format!("Token error: {}", e)))?;

    Ok(TokensResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.jwt.access_token_expiry_secs,
    })
}

/// POST /api/v1/auth/register
///
/// Create a new account and return its first token pair.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;
    password::check_password_strength(&request.password).map_err(ApiError::Validation)?;

    let user_repo = UserRepository::new(state.pool.clone());

    if user_repo
        .username_or_email_exists(&request.username, &request.email)
        .await?
    {
        return Err(ApiError::Conflict(
            "Username or email already taken".to_string(),
        ));
    }

    let password_hash = password::hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Password error: {}", e)))?;

    let user = user_repo
        .create_user(
            &request.username,
            &request.email,
            &password_hash,
            &request.first_name,
            &request.last_name,
            request.job_title.as_deref(),
            request.company.as_deref(),
        )
        .await?;

    let tokens = issue_tokens(&state, user.id)?;

    info!(user_id = %user.id, username = %user.username, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user_response(&user),
            tokens,
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username and password.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let user_repo = UserRepository::new(state.pool.clone());

    // The same error for unknown user and wrong password keeps login
    // responses from leaking which usernames exist.
    let user = user_repo
        .find_by_username(&request.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let matches = password::verify_password(&request.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password error: {}", e)))?;
    if !matches {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let tokens = issue_tokens(&state, user.id)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: user_response(&user),
        tokens,
    }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a new token pair.
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokensResponse>, ApiError> {
    let jwt_config = UserAuth::create_jwt_config(&state.config.jwt).map_err(ApiError::Internal)?;

    let claims = jwt_config
        .validate_refresh_token(&request.refresh_token)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired refresh token".to_string()))?;
    let user_id = jwt::extract_user_id(&claims)
        .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    // The account may have been removed since the token was minted.
    let user_repo = UserRepository::new(state.pool.clone());
    if user_repo.find_by_id(user_id).await?.is_none() {
        return Err(ApiError::Unauthorized("Unknown account".to_string()));
    }

    let tokens = issue_tokens(&state, user_id)?;
    Ok(Json(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_user_response_copies_fields() {
        let user = UserEntity {
            id: Uuid::new_v4(),
            username: "mwalker".to_string(),
            email: "mwalker@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            first_name: "Morgan".to_string(),
            last_name: "Walker".to_string(),
            job_title: Some("Program Officer".to_string()),
            company: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response = user_response(&user);
        assert_eq!(response.id, user.id);
        assert_eq!(response.username, "mwalker");
        assert_eq!(response.job_title.as_deref(), Some("Program Officer"));
        assert!(response.company.is_none());
    }

    #[test]
    fn test_refresh_request_deserializes() {
        let request: RefreshRequest =
            serde_json::from_str(r#"{"refresh_token": "abc"}"#).unwrap();
        assert_eq!(request.refresh_token, "abc");
    }
}
