//! Feedback entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the feedback table.
///
/// Exactly one row may exist per invitation; the unique index on
/// `invitation_id` backs the registry's exactly-once guarantee.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackEntity {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub inviter_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Feedback row joined with the giver's email from its invitation,
/// for the inviter's dashboard.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackWithGiverEntity {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub inviter_id: Uuid,
    pub recipient_email: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
