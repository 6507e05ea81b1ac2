use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::TokenRequest;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn verify_access_token<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    ApiJson(body): ApiJson<TokenRequest>,
) -> Result<ApiSuccess<bool>, ApiError> {
    let valid = state.auth_service.is_access_token_valid(&body.token);
    Ok(ApiSuccess::new(StatusCode::OK, valid))
}
