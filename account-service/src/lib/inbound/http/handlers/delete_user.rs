use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiJson;
use crate::inbound::http::handlers::EmailRequest;
use crate::inbound::http::router::AppState;

pub async fn delete_user<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    ApiJson(body): ApiJson<EmailRequest>,
) -> Result<StatusCode, ApiError> {
    let email = body.try_into_email()?;

    state
        .auth_service
        .delete_user(&email)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::OK)
}
