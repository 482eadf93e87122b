//! Invitation routes: inviting feedback givers and listing sent invitations.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{
    CreateInvitationsRequest, CreateInvitationsResponse, InvitationSummary,
    ListInvitationsResponse, RecipientOutcome,
};
use persistence::repositories::{InvitationRepository, UserRepository};
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_invitation_issued;

/// POST /api/v1/invitations
///
/// Issue one single-use invitation per recipient email and send each
/// recipient their feedback link. Recipients are processed independently: a
/// failed email leaves its invitation issued (the caller can resend) and
/// never affects the other recipients.
pub async fn create_invitations(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateInvitationsRequest>,
) -> Result<(StatusCode, Json<CreateInvitationsResponse>), ApiError> {
    request.validate()?;

    let user_repo = UserRepository::new(state.pool.clone());
    let inviter = user_repo
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;
    let inviter_name = inviter.display_name();

    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let mut outcomes = Vec::with_capacity(request.emails.len());

    for email in &request.emails {
        let invitation = match invitation_repo.issue(auth.user_id, email).await {
            Ok(invitation) => invitation,
            Err(e) => {
                warn!(inviter_id = %auth.user_id, email = %email, error = %e, "Failed to issue invitation");
                outcomes.push(RecipientOutcome {
                    email: email.clone(),
                    invitation_id: None,
                    feedback_url: None,
                    email_sent: false,
                    error: Some(e.to_string()),
                });
                continue;
            }
        };
        record_invitation_issued();

        let feedback_url = format!(
            "{}/feedback?token={}",
            state.config.server.app_base_url, invitation.token
        );

        // Mail is sent only after the invitation is durably issued; a
        // delivery failure must not undo it.
        let (email_sent, error) = match state
            .email
            .send_invitation_email(email, &inviter_name, &feedback_url)
            .await
        {
            Ok(()) => (true, None),
            Err(e) => {
                warn!(
                    invitation_id = %invitation.id,
                    email = %email,
                    error = %e,
                    "Invitation issued but email delivery failed"
                );
                (false, Some(e.to_string()))
            }
        };

        outcomes.push(RecipientOutcome {
            email: email.clone(),
            invitation_id: Some(invitation.id),
            feedback_url: Some(feedback_url),
            email_sent,
            error,
        });
    }

    info!(
        inviter_id = %auth.user_id,
        recipients = outcomes.len(),
        "Processed invitation batch"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateInvitationsResponse {
            invitations: outcomes,
        }),
    ))
}

/// GET /api/v1/invitations
///
/// List the caller's invitations, newest first.
pub async fn list_invitations(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListInvitationsResponse>, ApiError> {
    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let entities = invitation_repo.list_by_inviter(auth.user_id).await?;

    let data = entities
        .into_iter()
        .map(|entity| InvitationSummary {
            id: entity.id,
            recipient_email: entity.recipient_email,
            status: entity.status.into(),
            issued_at: entity.issued_at,
            consumed_at: entity.consumed_at,
        })
        .collect();

    Ok(Json(ListInvitationsResponse { data }))
}
