use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiJson;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn update_profile<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<StatusCode, ApiError> {
    let command = body.try_into_command()?;

    state
        .auth_service
        .update_profile(command)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::OK)
}

/// HTTP request body for overwriting display name and avatar (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    user_name: String,
    image_uri: String,
    email: String,
}

impl UpdateProfileRequest {
    fn try_into_command(self) -> Result<UpdateProfileCommand, UserError> {
        Ok(UpdateProfileCommand {
            email: EmailAddress::new(self.email)?,
            user_name: self.user_name,
            image_uri: self.image_uri,
        })
    }
}
