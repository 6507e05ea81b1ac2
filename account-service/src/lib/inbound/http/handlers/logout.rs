use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiJson;
use super::EmailRequest;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn logout<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    ApiJson(body): ApiJson<EmailRequest>,
) -> Result<StatusCode, ApiError> {
    let email = body.try_into_email()?;

    state
        .auth_service
        .logout(&email)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::OK)
}
