//! Feedback routes: the public token-gated submission flow and the
//! inviter's dashboard listing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    is_valid_token_format, ChatReply, ChatRequest, FeedbackResponse, ListFeedbackResponse,
    PublicInvitationInfo, SubmitFeedbackRequest, SubmitFeedbackResponse,
};
use persistence::repositories::{InvitationRepository, UserRepository};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_feedback_submitted;

/// GET /api/v1/feedback/invitations/:token
///
/// Public lookup for the feedback page. Returns the invitation regardless of
/// status; the page uses `status` to decide between showing the form and an
/// "already completed" notice.
pub async fn get_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<PublicInvitationInfo>, ApiError> {
    if !is_valid_token_format(&token) {
        return Err(ApiError::NotFound("Invitation token not found".to_string()));
    }

    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let invitation = invitation_repo
        .find_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation token not found".to_string()))?;

    let user_repo = UserRepository::new(state.pool.clone());
    let inviter = user_repo
        .find_by_id(invitation.inviter_id)
        .await?
        .ok_or_else(|| ApiError::Internal("Invitation has no inviter".to_string()))?;

    Ok(Json(PublicInvitationInfo {
        inviter_name: inviter.display_name(),
        recipient_email: invitation.recipient_email,
        status: invitation.status.into(),
    }))
}

/// POST /api/v1/feedback/invitations/:token
///
/// Public submission endpoint. Consumes the token and stores the content as
/// one atomic unit; a retried or double-clicked submission gets 410 instead
/// of creating a second record.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(request): Json<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<SubmitFeedbackResponse>), ApiError> {
    request.validate()?;

    if !is_valid_token_format(&token) {
        return Err(ApiError::NotFound("Invitation token not found".to_string()));
    }

    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let feedback = invitation_repo.consume(&token, &request.content).await?;
    record_feedback_submitted();

    info!(
        invitation_id = %feedback.invitation_id,
        feedback_id = %feedback.id,
        "Feedback submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitFeedbackResponse {
            id: feedback.id,
            created_at: feedback.created_at,
        }),
    ))
}

/// POST /api/v1/feedback/invitations/:token/chat
///
/// Public chat endpoint for the guided conversation. Forwards the running
/// history to the completion service and returns the assistant's next turn.
/// Holds no lock and no transaction: the token is only re-checked, and the
/// final transcript goes through the atomic submit endpoint.
pub async fn chat(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    request.validate()?;

    if !is_valid_token_format(&token) {
        return Err(ApiError::NotFound("Invitation token not found".to_string()));
    }

    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let invitation = invitation_repo
        .find_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation token not found".to_string()))?;

    if !invitation.is_pending() {
        return Err(ApiError::Gone(
            "Feedback has already been submitted for this invitation".to_string(),
        ));
    }

    let assistant = state.assistant.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("Chat assistant is not available".to_string())
    })?;

    let reply = assistant
        .continue_conversation(&request.history, &request.message)
        .await
        .map_err(|e| ApiError::ServiceUnavailable(format!("Chat assistant error: {}", e)))?;

    Ok(Json(ChatReply { reply }))
}

/// GET /api/v1/feedback
///
/// The inviter's dashboard: all feedback received, oldest first, with each
/// giver's email.
pub async fn list_my_feedback(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListFeedbackResponse>, ApiError> {
    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let entities = invitation_repo
        .list_feedback_with_givers(auth.user_id)
        .await?;

    let data = entities
        .into_iter()
        .map(|entity| FeedbackResponse {
            id: entity.id,
            giver_email: entity.recipient_email,
            content: entity.content,
            created_at: entity.created_at,
        })
        .collect();

    Ok(Json(ListFeedbackResponse { data }))
}
