//! Invitation domain models.
//!
//! An invitation is a single-use capability: the bearer of its token may
//! submit exactly one piece of feedback for the inviter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of an invitation token.
///
/// The only transition is `Pending` to `Consumed`, taken at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Consumed,
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvitationStatus::Pending => write!(f, "pending"),
            InvitationStatus::Consumed => write!(f, "consumed"),
        }
    }
}

/// Request to invite a batch of feedback givers by email.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationsRequest {
    #[validate(custom(function = "shared::validation::validate_recipient_emails"))]
    pub emails: Vec<String>,
}

/// Per-recipient outcome of an invitation request.
///
/// A recipient whose email could not be delivered still keeps its issued
/// token; `email_sent` tells the caller which invitations need a resend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RecipientOutcome {
    pub email: String,
    /// Absent only when issuing the invitation itself failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_url: Option<String>,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response after inviting a batch of feedback givers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationsResponse {
    pub invitations: Vec<RecipientOutcome>,
}

/// Summary of an invitation for the inviter's listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationSummary {
    pub id: Uuid,
    pub recipient_email: String,
    pub status: InvitationStatus,
    pub issued_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
}

/// Response for listing the caller's invitations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitationsResponse {
    pub data: Vec<InvitationSummary>,
}

/// Public invitation info shown on the feedback page (no auth).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicInvitationInfo {
    pub inviter_name: String,
    pub recipient_email: String,
    pub status: InvitationStatus,
}

lazy_static::lazy_static! {
    static ref TOKEN_REGEX: regex::Regex = regex::Regex::new(
        r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$"
    ).unwrap();
}

/// Checks whether a string has the shape of an invitation token (a lowercase
/// hyphenated UUID). Lets handlers reject junk before touching the database.
pub fn is_valid_token_format(token: &str) -> bool {
    TOKEN_REGEX.is_match(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&InvitationStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&InvitationStatus::Consumed).unwrap(),
            "\"consumed\""
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(InvitationStatus::Pending.to_string(), "pending");
        assert_eq!(InvitationStatus::Consumed.to_string(), "consumed");
    }

    #[test]
    fn test_create_request_accepts_valid_emails() {
        let request = CreateInvitationsRequest {
            emails: vec!["colleague@example.com".to_string()],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_empty_batch() {
        let request = CreateInvitationsRequest { emails: vec![] };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_invalid_email() {
        let request = CreateInvitationsRequest {
            emails: vec!["colleague@example.com".to_string(), "nope".to_string()],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_token_format_accepts_uuid() {
        let token = Uuid::new_v4().to_string();
        assert!(is_valid_token_format(&token));
    }

    #[test]
    fn test_token_format_rejects_junk() {
        assert!(!is_valid_token_format(""));
        assert!(!is_valid_token_format("abc123"));
        assert!(!is_valid_token_format("'; DROP TABLE invitations; --"));
        // Uppercase UUIDs are not how tokens are minted.
        assert!(!is_valid_token_format(
            "550E8400-E29B-41D4-A716-446655440000"
        ));
    }
}
