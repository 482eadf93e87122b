//! Repository for invitation and feedback database operations.
//!
//! An invitation token is a single-use capability. `consume` flips the
//! token to consumed and writes the feedback row in one transaction, so a
//! token can never be consumed twice and a consumed token always has
//! exactly one feedback record.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{FeedbackEntity, FeedbackWithGiverEntity, InvitationEntity};
use crate::metrics::QueryTimer;

/// Outcomes of invitation operations that are not plain storage success.
///
/// `NotFound` and `AlreadyConsumed` are expected results the HTTP layer
/// turns into user-facing responses, not failures.
#[derive(Debug, Error)]
pub enum InvitationError {
    #[error("Invitation token not found")]
    NotFound,

    #[error("Invitation has already been consumed")]
    AlreadyConsumed,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Repository for invitation operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Creates a new invitation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Issues a new single-use invitation for the given inviter and
    /// recipient, and returns the pending invitation.
    ///
    /// Sending the invitation email is the caller's job and must happen
    /// only after this returns successfully.
    pub async fn issue(
        &self,
        inviter_id: Uuid,
        recipient_email: &str,
    ) -> Result<InvitationEntity, InvitationError> {
        let recipient_email = recipient_email.trim();
        if recipient_email.is_empty() {
            return Err(InvitationError::Validation(
                "Recipient email must not be empty".to_string(),
            ));
        }

        let token = generate_invitation_token();

        let timer = QueryTimer::new("issue_invitation");
        let invitation = sqlx::query_as::<_, InvitationEntity>(
            r#"
            INSERT INTO invitations (token, inviter_id, recipient_email)
            VALUES ($1, $2, $3)
            RETURNING id, token, inviter_id, recipient_email, status, issued_at, consumed_at
            "#,
        )
        .bind(&token)
        .bind(inviter_id)
        .bind(recipient_email)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        tracing::debug!(
            invitation_id = %invitation.id,
            inviter_id = %inviter_id,
            "Issued invitation"
        );

        Ok(invitation)
    }

    /// Finds an invitation by its token, regardless of status.
    ///
    /// Returns `None` if no invitation with the given token exists. Callers
    /// presenting a submission form must additionally check `is_pending`;
    /// `consume` re-validates atomically either way, so a stale read here is
    /// harmless.
    pub async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitation_by_token");
        let result = sqlx::query_as::<_, InvitationEntity>(
            r#"
            SELECT id, token, inviter_id, recipient_email, status, issued_at, consumed_at
            FROM invitations
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Consumes a pending invitation and stores the feedback content, as a
    /// single atomic unit.
    ///
    /// The status flip is a conditional update (`... AND status = 'pending'`),
    /// so under concurrent calls on the same token exactly one succeeds and
    /// the rest observe [`InvitationError::AlreadyConsumed`]. The feedback
    /// insert commits in the same transaction; on any storage error the
    /// invitation stays pending and no partial feedback row is visible.
    pub async fn consume(
        &self,
        token: &str,
        content: &str,
    ) -> Result<FeedbackEntity, InvitationError> {
        if content.trim().is_empty() {
            return Err(InvitationError::Validation(
                "Feedback content must not be empty".to_string(),
            ));
        }

        let timer = QueryTimer::new("consume_invitation");
        let mut tx = self.pool.begin().await?;

        let consumed = sqlx::query_as::<_, InvitationEntity>(
            r#"
            UPDATE invitations
            SET status = 'consumed', consumed_at = NOW()
            WHERE token = $1 AND status = 'pending'
            RETURNING id, token, inviter_id, recipient_email, status, issued_at, consumed_at
            "#,
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?;

        let invitation = match consumed {
            Some(invitation) => invitation,
            None => {
                // Nothing was updated: either the token does not exist, or a
                // concurrent call got there first.
                let exists = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM invitations WHERE token = $1)",
                )
                .bind(token)
                .fetch_one(&mut *tx)
                .await?;

                return Err(if exists {
                    InvitationError::AlreadyConsumed
                } else {
                    InvitationError::NotFound
                });
            }
        };

        let feedback = sqlx::query_as::<_, FeedbackEntity>(
            r#"
            INSERT INTO feedback (invitation_id, inviter_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, invitation_id, inviter_id, content, created_at
            "#,
        )
        .bind(invitation.id)
        .bind(invitation.inviter_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        tracing::debug!(
            invitation_id = %invitation.id,
            feedback_id = %feedback.id,
            "Consumed invitation"
        );

        Ok(feedback)
    }

    /// Lists the invitations issued by a user, newest first.
    pub async fn list_by_inviter(
        &self,
        inviter_id: Uuid,
    ) -> Result<Vec<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_invitations_by_inviter");
        let result = sqlx::query_as::<_, InvitationEntity>(
            r#"
            SELECT id, token, inviter_id, recipient_email, status, issued_at, consumed_at
            FROM invitations
            WHERE inviter_id = $1
            ORDER BY issued_at DESC, id DESC
            "#,
        )
        .bind(inviter_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists the feedback received by a user, in creation order.
    pub async fn list_feedback_for(
        &self,
        inviter_id: Uuid,
    ) -> Result<Vec<FeedbackEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_feedback_for_inviter");
        let result = sqlx::query_as::<_, FeedbackEntity>(
            r#"
            SELECT id, invitation_id, inviter_id, content, created_at
            FROM feedback
            WHERE inviter_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(inviter_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists the feedback received by a user joined with each giver's email,
    /// for the dashboard view.
    pub async fn list_feedback_with_givers(
        &self,
        inviter_id: Uuid,
    ) -> Result<Vec<FeedbackWithGiverEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_feedback_with_givers");
        let result = sqlx::query_as::<_, FeedbackWithGiverEntity>(
            r#"
            SELECT f.id, f.invitation_id, f.inviter_id, i.recipient_email, f.content, f.created_at
            FROM feedback f
            JOIN invitations i ON i.id = f.invitation_id
            WHERE f.inviter_id = $1
            ORDER BY f.created_at ASC, f.id ASC
            "#,
        )
        .bind(inviter_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

/// Generates an invitation token: a version-4 random UUID.
///
/// Tokens are bearer capabilities, so they must be unguessable; the 122
/// random bits of a v4 UUID make collisions and enumeration negligible.
pub fn generate_invitation_token() -> String {
    Uuid::new_v4().to_string()
}
