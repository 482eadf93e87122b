//! Profile routes for the authenticated user.

use axum::{extract::State, Json};
use domain::models::{UpdateProfileRequest, UserResponse};
use persistence::repositories::UserRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::auth::user_response;

/// GET /api/v1/users/me
///
/// Fetch the caller's profile.
pub async fn get_me(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<UserResponse>, ApiError> {
    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    Ok(Json(user_response(&user)))
}

/// PUT /api/v1/users/me
///
/// Update the caller's profile fields.
pub async fn update_me(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    request.validate()?;

    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .update_profile(
            auth.user_id,
            &request.first_name,
            &request.last_name,
            request.job_title.as_deref(),
            request.company.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    info!(user_id = %auth.user_id, "Updated profile");

    Ok(Json(user_response(&user)))
}
