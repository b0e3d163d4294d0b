use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use service::auth::{
    domain::{LoginOutcome, RegisterOutcome, User},
    repository::CredentialStore,
    AuthService,
};

use crate::errors::ApiError;
use crate::metrics::{LOGIN_TOTAL, REGISTER_TOTAL};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<dyn CredentialStore>>,
}

impl AppState {
    pub fn new(auth: AuthService<dyn CredentialStore>) -> Self {
        Self { auth: Arc::new(auth) }
    }
}

fn body(payload: Result<Json<User>, JsonRejection>) -> Result<User, ApiError> {
    payload.map(|Json(u)| u).map_err(|e| ApiError::BadRequest(e.body_text()))
}

/// `POST /api/auth/register`
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<User>, JsonRejection>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let user = body(payload)?;
    let outcome = match state.auth.register(user).await {
        Ok(o) => o,
        Err(e) => {
            REGISTER_TOTAL.with_label_values(&["error"]).inc();
            return Err(e.into());
        }
    };
    let (label, status) = match outcome {
        RegisterOutcome::Registered => ("registered", StatusCode::OK),
        RegisterOutcome::UsernameTaken => ("username_taken", StatusCode::CONFLICT),
    };
    REGISTER_TOTAL.with_label_values(&[label]).inc();
    Ok((status, outcome.message()))
}

/// `POST /api/auth/login`
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<User>, JsonRejection>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let user = body(payload)?;
    let outcome = match state.auth.login(user).await {
        Ok(o) => o,
        Err(e) => {
            LOGIN_TOTAL.with_label_values(&["error"]).inc();
            return Err(e.into());
        }
    };
    let (label, status) = match outcome {
        LoginOutcome::LoginSuccess => ("success", StatusCode::OK),
        LoginOutcome::InvalidCredentials => ("invalid_credentials", StatusCode::UNAUTHORIZED),
    };
    LOGIN_TOTAL.with_label_values(&[label]).inc();
    Ok((status, outcome.message()))
}
