//! Login and registration form validation
//!
//! Validation is local: a form with field errors never reaches the
//! [`AuthGateway`]. Each field reports only its first failing rule.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::gateway::AuthGateway;
use crate::models::{Account, Credentials, Registration, Session};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Minimum password length for registration unless configured otherwise
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// A validation message attached to one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn into_result(errors: Vec<FieldError>) -> CoreResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ValidationFailed { errors })
    }
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    let email = email.trim();
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !EMAIL_RE.is_match(email) {
        errors.push(FieldError::new("email", "Invalid email"));
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

impl LoginForm {
    pub fn validate(&self) -> CoreResult<()> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }
        into_result(errors)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }

    /// Validate, then hand the credentials to the auth service
    pub async fn submit<G>(&self, gateway: &G) -> CoreResult<Session>
    where
        G: AuthGateway + ?Sized,
    {
        self.validate()?;
        let session = gateway.login(&self.credentials()).await;
        match &session {
            Ok(_) => log::info!(target: "payboard::auth", "login succeeded for {}", self.email.trim()),
            Err(e) => log::warn!(target: "payboard::auth", "login failed for {}: {}", self.email.trim(), e),
        }
        session
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub agree_to_terms: bool,
}

impl RegisterForm {
    pub fn validate(&self, min_password_length: usize) -> CoreResult<()> {
        let mut errors = Vec::new();

        if self.full_name.trim().is_empty() {
            errors.push(FieldError::new("fullName", "Full name is required"));
        }

        check_email(&self.email, &mut errors);

        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        } else if self.password.chars().count() < min_password_length {
            errors.push(FieldError::new(
                "password",
                format!("Password must be at least {} characters", min_password_length),
            ));
        }

        if self.confirm_password.is_empty() {
            errors.push(FieldError::new("confirmPassword", "Confirm password is required"));
        } else if self.confirm_password != self.password {
            errors.push(FieldError::new("confirmPassword", "Passwords must match"));
        }

        if !self.agree_to_terms {
            errors.push(FieldError::new("agreeToTerms", "You must agree to the terms and conditions"));
        }

        into_result(errors)
    }

    pub fn registration(&self) -> Registration {
        Registration {
            name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }

    /// Validate, then create the account through the auth service
    pub async fn submit<G>(&self, gateway: &G, min_password_length: usize) -> CoreResult<Account>
    where
        G: AuthGateway + ?Sized,
    {
        self.validate(min_password_length)?;
        let account = gateway.register(&self.registration()).await;
        if let Err(e) = &account {
            log::warn!(target: "payboard::auth", "registration failed for {}: {}", self.email.trim(), e);
        }
        account
    }
}
