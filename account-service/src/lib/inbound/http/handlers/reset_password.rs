use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiJson;
use super::FieldErrors;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::ResetPasswordCommand;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn reset_password<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    ApiJson(body): ApiJson<ResetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .auth_service
        .reset_password(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::OK)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequest {
    email: String,
    password: String,
}

impl ResetPasswordRequest {
    fn try_into_command(self) -> Result<ResetPasswordCommand, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = errors.check("email", EmailAddress::new(self.email));
        let password = errors.check("password", Password::new(self.password));

        match (email, password) {
            (Some(email), Some(password)) => Ok(ResetPasswordCommand { email, password }),
            _ => Err(errors),
        }
    }
}
