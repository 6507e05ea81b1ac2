use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::delete_user::delete_user;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::handlers::reset_password::reset_password;
use super::handlers::update_profile::update_profile;
use super::handlers::update_user::update_user;
use super::handlers::verify_access_token::verify_access_token;
use super::handlers::verify_refresh_token::verify_refresh_token;
use crate::domain::user::ports::AuthServicePort;

pub struct AppState<S: AuthServicePort> {
    pub auth_service: Arc<S>,
}

impl<S: AuthServicePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
        }
    }
}

pub fn create_router<S: AuthServicePort>(auth_service: Arc<S>) -> Router {
    let state = AppState { auth_service };

    let auth_routes = Router::new()
        .route("/auth/register", post(register::<S>))
        .route("/auth/login", post(login::<S>))
        .route("/auth/logout", post(logout::<S>))
        .route("/auth/refresh", post(refresh::<S>))
        .route("/auth/resetPassword", post(reset_password::<S>))
        .route("/auth/updateProfile", post(update_profile::<S>))
        .route("/auth/update", post(update_user::<S>))
        .route("/auth/delete", post(delete_user::<S>))
        .route("/auth/verifyAccessToken", post(verify_access_token::<S>))
        .route("/auth/verifyRefreshToken", post(verify_refresh_token::<S>));

    // Request headers are not recorded; they may carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(auth_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use auth::Authenticator;
    use auth::TokenCodec;
    use axum::body::Body;
    use chrono::Duration;
    use http::header::CONTENT_TYPE;
    use http::Request;
    use http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::user::service::AuthService;
    use crate::outbound::repositories::InMemoryRefreshTokenRepository;
    use crate::outbound::repositories::InMemoryUserRepository;

    fn router() -> Router {
        let authenticator = Authenticator::new(TokenCodec::new(
            b"test_secret_key_at_least_32_bytes!",
            Duration::minutes(15),
            Duration::days(30),
        ));
        create_router(Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryRefreshTokenRepository::new()),
            Arc::new(authenticator),
        )))
    }

    fn json_post(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_verify_rejects_garbage_token() {
        let response = router()
            .oneshot(json_post("/auth/verifyAccessToken", r#"{"token":"garbage"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"false");
    }

    #[tokio::test]
    async fn test_routes_accept_post_only() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/auth/login")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_missing_field_uses_error_envelope() {
        let response = router()
            .oneshot(json_post("/auth/login", r#"{"email":"ann@x.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], 400);
        assert!(body["errors"].is_null());
    }
}
