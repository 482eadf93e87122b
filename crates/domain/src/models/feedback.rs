//! Feedback domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to submit feedback for a pending invitation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitFeedbackRequest {
    /// Free-form text or a rendered chat transcript.
    #[validate(custom(function = "shared::validation::validate_feedback_content"))]
    pub content: String,
}

/// A piece of received feedback, as shown on the inviter's dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FeedbackResponse {
    pub id: Uuid,
    /// Email of the colleague who gave the feedback.
    pub giver_email: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Response for listing the caller's received feedback.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListFeedbackResponse {
    pub data: Vec<FeedbackResponse>,
}

/// Acknowledgment returned to the giver after a successful submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SubmitFeedbackResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_accepts_text() {
        let request = SubmitFeedbackRequest {
            content: "Great collaborator, always prepared.".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_submit_request_rejects_blank_content() {
        let request = SubmitFeedbackRequest {
            content: "  \n ".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
