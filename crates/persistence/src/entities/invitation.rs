//! Invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::InvitationStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database-side invitation status, backed by the `invitation_status`
/// Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
pub enum InvitationStatusDb {
    Pending,
    Consumed,
}

impl From<InvitationStatusDb> for InvitationStatus {
    fn from(status: InvitationStatusDb) -> Self {
        match status {
            InvitationStatusDb::Pending => InvitationStatus::Pending,
            InvitationStatusDb::Consumed => InvitationStatus::Consumed,
        }
    }
}

/// Database row mapping for the invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub token: String,
    pub inviter_id: Uuid,
    pub recipient_email: String,
    pub status: InvitationStatusDb,
    pub issued_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
}

impl InvitationEntity {
    /// Whether this invitation can still accept a feedback submission.
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatusDb::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(status: InvitationStatusDb) -> InvitationEntity {
        InvitationEntity {
            id: Uuid::new_v4(),
            token: Uuid::new_v4().to_string(),
            inviter_id: Uuid::new_v4(),
            recipient_email: "colleague@example.com".to_string(),
            status,
            issued_at: Utc::now(),
            consumed_at: None,
        }
    }

    #[test]
    fn test_pending_invitation_is_pending() {
        assert!(entity(InvitationStatusDb::Pending).is_pending());
    }

    #[test]
    fn test_consumed_invitation_is_not_pending() {
        assert!(!entity(InvitationStatusDb::Consumed).is_pending());
    }

    #[test]
    fn test_status_converts_to_domain() {
        assert_eq!(
            InvitationStatus::from(InvitationStatusDb::Pending),
            InvitationStatus::Pending
        );
        assert_eq!(
            InvitationStatus::from(InvitationStatusDb::Consumed),
            InvitationStatus::Consumed
        );
    }
}
