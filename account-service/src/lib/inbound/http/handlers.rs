use std::fmt::Display;

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::EmailAddress;
use crate::user::errors::UserError;

pub mod delete_user;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod reset_password;
pub mod update_profile;
pub mod update_user;
pub mod verify_access_token;
pub mod verify_refresh_token;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// JSON body extractor whose rejections use the error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Validation(Vec<String>),
    Conflict(String),
    Unauthorized(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
        };

        (status, Json(ApiErrorBody::new(status, message, errors))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidEmail(_) => ApiError::Validation(vec![field_error("email", &err)]),
            UserError::WeakPassword(_) => {
                ApiError::Validation(vec![field_error("password", &err)])
            }
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials
            | UserError::EmailNotRegistered
            | UserError::ProfileUpdateFailed
            | UserError::InvalidRefreshToken
            | UserError::RefreshTokenNotRecognized => ApiError::Unauthorized(err.to_string()),
            UserError::PasswordHashing(_)
            | UserError::TokenIssuance(_)
            | UserError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

fn field_error(field: &str, err: &dyn Display) -> String {
    format!("{}: {}", field, err)
}

/// Collects per-field validation failures while a request body is parsed.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the error of `result` against `field`, returning the value on success.
    pub fn check<T, E: Display>(&mut self, field: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.0.push(field_error(field, &e));
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub message: String,
    pub errors: Option<Vec<String>>,
}

impl ApiErrorBody {
    pub fn new(status: StatusCode, message: String, errors: Option<Vec<String>>) -> Self {
        Self {
            status: status.as_u16(),
            message,
            errors,
        }
    }
}

/// Profile plus a fresh token pair, returned by login, update and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponseData {
    pub user_name: String,
    pub email: String,
    pub image_uri: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<AuthSession> for SessionResponseData {
    fn from(session: AuthSession) -> Self {
        Self {
            user_name: session.user.user_name,
            email: session.user.email.to_string(),
            image_uri: session.user.image_uri,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        }
    }
}

/// Request body identifying an account by email.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

impl EmailRequest {
    pub fn try_into_email(self) -> Result<EmailAddress, ApiError> {
        EmailAddress::new(self.email)
            .map_err(UserError::from)
            .map_err(ApiError::from)
    }
}

/// Request body carrying a single bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::errors::EmailError;
    use crate::user::errors::PasswordPolicyError;

    #[test]
    fn test_validation_errors_are_prefixed_with_field() {
        let err = ApiError::from(UserError::InvalidEmail(EmailError::InvalidFormat));
        assert_eq!(
            err,
            ApiError::Validation(vec!["email: Invalid email format.".to_string()])
        );

        let err = ApiError::from(UserError::WeakPassword(PasswordPolicyError::TooWeak));
        match err {
            ApiError::Validation(errors) => assert!(errors[0].starts_with("password: ")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        assert_eq!(
            ApiError::from(UserError::InvalidCredentials),
            ApiError::Unauthorized("Invalid credentials.".to_string())
        );
        assert_eq!(
            ApiError::from(UserError::EmailNotRegistered),
            ApiError::Unauthorized("Email not registered.".to_string())
        );
        assert_eq!(
            ApiError::from(UserError::EmailAlreadyExists("ann@x.com".to_string())),
            ApiError::Conflict("A user with that email already exists.".to_string())
        );
    }

    #[test]
    fn test_field_errors_collects_all_failures() {
        let mut errors = FieldErrors::new();
        let ok: Option<u8> = errors.check("userName", Ok::<u8, EmailError>(1));
        let email: Option<u8> = errors.check("email", Err(EmailError::InvalidFormat));
        let password: Option<u8> = errors.check("password", Err(PasswordPolicyError::TooWeak));

        assert_eq!(ok, Some(1));
        assert!(email.is_none() && password.is_none());
        assert!(!errors.is_empty());
        match ApiError::from(errors) {
            ApiError::Validation(messages) => {
                assert_eq!(messages.len(), 2);
                assert_eq!(messages[0], "email: Invalid email format.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
