use postboard::{
    auth::repository::{InMemoryUserRepository, PostgresUserRepository},
    build_router,
    posts::repository::{InMemoryPostRepository, PostgresPostRepository},
    token::{
        repository::{InMemoryBlacklistRepository, PostgresBlacklistRepository},
        start_blacklist_cleanup_task, TokenService,
    },
    AppConfig, AppState, TokenConfig,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting post board server");

    let config = AppConfig::from_env();
    let token_config = TokenConfig::new(
        config.access_token_secret.clone(),
        config.refresh_token_secret.clone(),
    );

    // Storage is chosen once here and injected everywhere through AppState
    let app_state = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await?;
            sqlx::migrate!().run(&pool).await?;
            info!("Connected to PostgreSQL and applied migrations");

            AppState::new(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresPostRepository::new(pool.clone())),
                Arc::new(PostgresBlacklistRepository::new(pool)),
                token_config,
                config.bcrypt_cost,
            )
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory storage");
            AppState::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryPostRepository::new()),
                Arc::new(InMemoryBlacklistRepository::new()),
                token_config,
                config.bcrypt_cost,
            )
        }
    };

    let cleanup_service = TokenService::new(
        app_state.token_config.clone(),
        Arc::clone(&app_state.blacklist_repository),
    );
    tokio::spawn(start_blacklist_cleanup_task(
        cleanup_service,
        config.blacklist_cleanup_interval,
    ));

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
