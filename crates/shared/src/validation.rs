//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of a feedback payload (free-form text or rendered
/// chat transcript).
pub const MAX_FEEDBACK_CONTENT_LEN: usize = 65_536;

/// Maximum number of recipients a single invitation request may carry.
pub const MAX_INVITATION_RECIPIENTS: usize = 20;

/// Validates that feedback content is non-empty (ignoring whitespace) and
/// within the size limit.
pub fn validate_feedback_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        let mut err = ValidationError::new("content_empty");
        err.message = Some("Feedback content must not be empty".into());
        return Err(err);
    }
    if content.len() > MAX_FEEDBACK_CONTENT_LEN {
        let mut err = ValidationError::new("content_too_long");
        err.message = Some("Feedback content exceeds the maximum length".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a batch of invitation recipient addresses: at least one entry,
/// within the batch limit, each a plausible email address.
pub fn validate_recipient_emails(emails: &Vec<String>) -> Result<(), ValidationError> {
    if emails.is_empty() {
        let mut err = ValidationError::new("recipients_empty");
        err.message = Some("At least one recipient email is required".into());
        return Err(err);
    }
    if emails.len() > MAX_INVITATION_RECIPIENTS {
        let mut err = ValidationError::new("recipients_too_many");
        err.message = Some("Too many recipients in one request".into());
        return Err(err);
    }
    for email in emails {
        if !validator::ValidateEmail::validate_email(email) {
            let mut err = ValidationError::new("recipient_invalid");
            err.message = Some(format!("Invalid recipient email: {}", email).into());
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_content_accepts_text() {
        assert!(validate_feedback_content("She led the rollout calmly.").is_ok());
    }

    #[test]
    fn test_feedback_content_rejects_empty() {
        assert!(validate_feedback_content("").is_err());
        assert!(validate_feedback_content("   \n\t").is_err());
    }

    #[test]
    fn test_feedback_content_rejects_oversized() {
        let huge = "x".repeat(MAX_FEEDBACK_CONTENT_LEN + 1);
        let err = validate_feedback_content(&huge).unwrap_err();
        assert_eq!(err.code, "content_too_long");
    }

    #[test]
    fn test_feedback_content_accepts_at_limit() {
        let at_limit = "x".repeat(MAX_FEEDBACK_CONTENT_LEN);
        assert!(validate_feedback_content(&at_limit).is_ok());
    }

    #[test]
    fn test_recipients_accepts_valid_batch() {
        let emails = vec![
            "alice@example.com".to_string(),
            "bob@example.org".to_string(),
        ];
        assert!(validate_recipient_emails(&emails).is_ok());
    }

    #[test]
    fn test_recipients_rejects_empty_batch() {
        let err = validate_recipient_emails(&vec![]).unwrap_err();
        assert_eq!(err.code, "recipients_empty");
    }

    #[test]
    fn test_recipients_rejects_oversized_batch() {
        let emails: Vec<String> = (0..=MAX_INVITATION_RECIPIENTS)
            .map(|i| format!("user{}@example.com", i))
            .collect();
        let err = validate_recipient_emails(&emails).unwrap_err();
        assert_eq!(err.code, "recipients_too_many");
    }

    #[test]
    fn test_recipients_rejects_invalid_address() {
        let emails = vec!["alice@example.com".to_string(), "not-an-email".to_string()];
        let err = validate_recipient_emails(&emails).unwrap_err();
        assert_eq!(err.code, "recipient_invalid");
    }
}
