//! User domain models and account request/response types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to create a new account.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 150, message = "Username must be 3-150 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Strength rules are enforced separately at registration time.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(min = 1, max = 150, message = "First name must be 1-150 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 150, message = "Last name must be 1-150 characters"))]
    pub last_name: String,

    #[validate(length(max = 150, message = "Job title must be at most 150 characters"))]
    pub job_title: Option<String>,

    #[validate(length(max = 150, message = "Company must be at most 150 characters"))]
    pub company: Option<String>,
}

/// Request to log in with username and password.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request to update the caller's profile.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 150, message = "First name must be 1-150 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 150, message = "Last name must be 1-150 characters"))]
    pub last_name: String,

    #[validate(length(max = 150, message = "Job title must be at most 150 characters"))]
    pub job_title: Option<String>,

    #[validate(length(max = 150, message = "Company must be at most 150 characters"))]
    pub company: Option<String>,
}

/// Public view of a user account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub job_title: Option<String>,
    pub company: Option<String>,
}

/// Bearer tokens issued after registration, login, or refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            username: "mwalker".to_string(),
            email: SafeEmail().fake(),
            password: "Feedback1".to_string(),
            first_name: "Morgan".to_string(),
            last_name: "Walker".to_string(),
            job_title: Some("Program Officer".to_string()),
            company: None,
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let mut request = valid_request();
        request.email = "not-an-email".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_username() {
        let mut request = valid_request();
        request.username = "ab".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_empty_names() {
        let mut request = valid_request();
        request.first_name = String::new();
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.last_name = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_oversized_job_title() {
        let mut request = valid_request();
        request.job_title = Some("x".repeat(151));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_requires_both_fields() {
        let request = LoginRequest {
            username: String::new(),
            password: "Feedback1".to_string(),
        };
        assert!(request.validate().is_err());

        let request = LoginRequest {
            username: "mwalker".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_profile_request_valid() {
        let request = UpdateProfileRequest {
            first_name: "Morgan".to_string(),
            last_name: "Walker".to_string(),
            job_title: None,
            company: Some("Acme".to_string()),
        };
        assert!(request.validate().is_ok());
    }
}
