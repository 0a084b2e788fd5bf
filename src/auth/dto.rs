use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, FieldError};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    /// Every violated field is reported, before any store access.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Please include a valid email"));
        }
        if self.password.len() < 6 {
            errors.push(FieldError::new(
                "password",
                "Please enter a password with 6 or more characters",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Please include a valid email"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_emails() {
        assert!(is_valid_email("x@x.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@at@signs.com"));
    }

    #[test]
    fn login_empty_password_names_the_field() {
        let req = LoginRequest {
            email: "x@x.com".into(),
            password: "".into(),
        };
        let err = req.validate().unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].param, "password");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn login_reports_every_violation() {
        let req = LoginRequest {
            email: "nope".into(),
            password: "".into(),
        };
        match req.validate().unwrap_err() {
            ApiError::Validation(errors) => {
                let params: Vec<_> = errors.iter().map(|e| e.param).collect();
                assert_eq!(params, vec!["email", "password"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn register_rejects_short_password() {
        let req = RegisterRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "12345".into(),
        };
        match req.validate().unwrap_err() {
            ApiError::Validation(errors) => {
                assert_eq!(errors[0].param, "password");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
