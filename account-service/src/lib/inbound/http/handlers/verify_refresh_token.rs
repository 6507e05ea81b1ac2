use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::TokenRequest;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Signature, expiry and type only. A redeemed refresh token still reports true
/// until it expires.
pub async fn verify_refresh_token<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    ApiJson(body): ApiJson<TokenRequest>,
) -> Result<ApiSuccess<bool>, ApiError> {
    let valid = state.auth_service.is_refresh_token_valid(&body.token);
    Ok(ApiSuccess::new(StatusCode::OK, valid))
}
