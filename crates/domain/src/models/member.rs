//! Member account model and account-management request types.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

/// Code attached to case-insensitive username collisions.
pub const UNIQUE_USERNAME_CODE: &str = "unique_username";

/// Message shown for username collisions.
pub const UNIQUE_USERNAME_MESSAGE: &str = "A user with that username already exists.";

/// Code attached to signup/change requests whose password pair differs.
pub const PASSWORD_MISMATCH_CODE: &str = "password_mismatch";

/// Message shown when the two password fields differ.
pub const PASSWORD_MISMATCH_MESSAGE: &str = "The two password fields didn't match.";

/// Code attached to the password-confirmation gate failing.
pub const WRONG_PASSWORD_CODE: &str = "wrong_password";

/// Message shown when the confirmation password is wrong.
pub const WRONG_PASSWORD_MESSAGE: &str = "The password is incorrect";

/// Code attached when a new password equals the old one.
pub const UNIQUE_PASSWORD_CODE: &str = "unique_password";

/// Message shown when a new password equals the old one.
pub const UNIQUE_PASSWORD_MESSAGE: &str = "New password must be different from old password";

/// A site member; the root of the ownership hierarchy.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

/// Validates an email field that may be left blank.
pub fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.validate_email() {
        return Ok(());
    }
    let mut err = ValidationError::new("invalid");
    err.message = Some("Enter a valid email address".into());
    Err(err)
}

/// Request body for member signup.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(custom(function = "shared::validation::validate_username"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(max = 150, message = "First name must be at most 150 characters"))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 150, message = "Last name must be at most 150 characters"))]
    pub last_name: String,

    #[serde(default)]
    #[validate(custom(function = "crate::models::member::validate_optional_email"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password1: String,

    pub password2: String,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, code = "required", message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, code = "required", message = "Password is required"))]
    pub password: String,
}

/// Request body for password-gated destructive actions
/// (account deactivation and deletion).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConfirmPasswordRequest {
    #[validate(length(min = 1, code = "required", message = "Please enter your password"))]
    pub password: String,
}

/// Request body for changing the password while logged in.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PasswordChangeRequest {
    #[validate(length(min = 1, code = "required", message = "Please enter your password"))]
    pub old_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password1: String,

    pub new_password2: String,
}

/// Request body for starting a password reset.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
}

/// Request body for completing a password reset with an emailed token.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PasswordResetConfirmRequest {
    #[validate(length(min = 1, code = "required", message = "Reset token is required"))]
    pub token: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password1: String,

    pub new_password2: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            first_name: "First".to_string(),
            last_name: "Member".to_string(),
            email: "first@example.com".to_string(),
            password1: "correct-horse-battery".to_string(),
            password2: "correct-horse-battery".to_string(),
        }
    }

    #[test]
    fn test_signup_request_valid() {
        assert!(signup("first_member").validate().is_ok());
    }

    #[test]
    fn test_signup_request_invalid_username() {
        assert!(signup("not a slug").validate().is_err());
        assert!(signup("").validate().is_err());
    }

    #[test]
    fn test_signup_request_short_password() {
        let mut req = signup("first_member");
        req.password1 = "short".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_signup_request_allows_blank_email() {
        let mut req = signup("first_member");
        req.email = String::new();
        assert!(req.validate().is_ok());

        req.email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_password_change_request_requires_old_password() {
        let req = PasswordChangeRequest {
            old_password: String::new(),
            new_password1: "new-password-1".to_string(),
            new_password2: "new-password-1".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
