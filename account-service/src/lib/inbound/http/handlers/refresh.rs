use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::SessionResponseData;
use super::TokenRequest;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn refresh<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    ApiJson(body): ApiJson<TokenRequest>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    state
        .auth_service
        .refresh(&body.token)
        .await
        .map_err(ApiError::from)
        .map(|session| ApiSuccess::new(StatusCode::OK, session.into()))
}
