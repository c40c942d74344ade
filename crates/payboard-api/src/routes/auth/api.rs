//! Auth endpoints
//!
//! Forms are validated locally; only valid submissions reach the backend.

use crate::error::{ApiError, ResultExt};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use payboard_core::{Account, LoginForm, PasswordStrength, RegisterForm, Session};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PasswordCheck {
    #[serde(default)]
    pub password: String,
}

/// Sign in through the backend
pub async fn api_login(State(state): State<AppState>, Json(form): Json<LoginForm>) -> Result<Json<Session>, ApiError> {
    let session = form.submit(state.gateway.as_ref()).await.during("login")?;
    Ok(Json(session))
}

/// Create an account through the backend
pub async fn api_register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let account = form
        .submit(state.gateway.as_ref(), state.config.forms.min_password_length)
        .await
        .during("register")?;
    log::info!(target: "payboard::auth", "registered account {}", account.id);
    Ok((StatusCode::CREATED, Json(account)))
}

/// Strength meter for the registration form
pub async fn api_password_strength(Json(check): Json<PasswordCheck>) -> Json<PasswordStrength> {
    Json(PasswordStrength::evaluate(&check.password))
}
