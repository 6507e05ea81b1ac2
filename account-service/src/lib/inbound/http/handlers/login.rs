use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::SessionResponseData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn login<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let command = LoginCommand {
        email: EmailAddress::new(body.email).map_err(UserError::from)?,
        password: body.password,
    };

    state
        .auth_service
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|session| ApiSuccess::new(StatusCode::OK, session.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}
