use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiJson;
use super::FieldErrors;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn register<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::OK)
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    user_name: String,
    image_uri: String,
    email: String,
    password: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = errors.check("email", EmailAddress::new(self.email));
        let password = errors.check("password", Password::new(self.password));

        match (email, password) {
            (Some(email), Some(password)) => Ok(RegisterCommand::new(
                self.user_name,
                email,
                password,
                self.image_uri,
            )),
            _ => Err(errors),
        }
    }
}
