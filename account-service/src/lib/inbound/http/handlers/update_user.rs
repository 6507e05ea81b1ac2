use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::UpdateUserCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiJson;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::FieldErrors;
use crate::inbound::http::handlers::SessionResponseData;
use crate::inbound::http::router::AppState;
use crate::user::ports::AuthServicePort;

/// HTTP request body for updating an account (raw JSON)
///
/// A missing or blank password keeps the current one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub user_name: String,
    pub image_uri: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = errors.check("email", EmailAddress::new(self.email));
        let password = match self.password.filter(|p| !p.trim().is_empty()) {
            Some(raw) => errors
                .check("password", Password::new(raw))
                .map(Some),
            None => Some(None),
        };

        match (email, password) {
            (Some(email), Some(password)) => Ok(UpdateUserCommand {
                email,
                user_name: self.user_name,
                image_uri: self.image_uri,
                password,
            }),
            _ => Err(errors),
        }
    }
}

pub async fn update_user<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    // Parse request at HTTP boundary
    let command = req.try_into_command()?;

    state
        .auth_service
        .update_user(command)
        .await
        .map_err(ApiError::from)
        .map(|session| ApiSuccess::new(StatusCode::OK, session.into()))
}
