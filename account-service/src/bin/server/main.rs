use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::user::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::PostgresRefreshTokenRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use auth::Authenticator;
use auth::TokenCodec;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        access_token_ttl_minutes = config.jwt.access_token_ttl_minutes,
        refresh_token_ttl_days = config.jwt.refresh_token_ttl_days,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_codec = TokenCodec::new(
        config.jwt.secret.as_bytes(),
        config.jwt.access_token_validity(),
        config.jwt.refresh_token_validity(),
    );
    let authenticator = Arc::new(Authenticator::new(token_codec));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let refresh_token_repository = Arc::new(PostgresRefreshTokenRepository::new(pg_pool));

    let auth_service = Arc::new(AuthService::new(
        user_repository,
        refresh_token_repository,
        authenticator,
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service);
    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
