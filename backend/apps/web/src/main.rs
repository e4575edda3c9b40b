//! Web Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors go through
//! `gateway::GatewayError` and `kernel::error::AppError`.

mod config;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use gateway::domain::repository::{SessionRepository, UserRepository};
use gateway::{
    GatewayConfig, GatewayError, MemoryRepository, MessageCatalog, PgGatewayRepository,
    UserStore, gateway_router,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired sessions are purged
const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web=info,gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server = config::load_server_config()?;
    let gateway_config = config::load_gateway_config()?;

    let messages = match &server.messages_file {
        Some(path) => {
            let source = tokio::fs::read_to_string(path).await?;
            tracing::info!(path = %path, "Loaded message bundle");
            MessageCatalog::from_properties(&source)
        }
        None => MessageCatalog::english(),
    };

    let gateway = match &server.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let repo = PgGatewayRepository::new(pool);
            prepare_store(&repo, &gateway_config, server.admin.as_ref()).await?;
            gateway_router(repo, gateway_config, messages)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");

            let repo = MemoryRepository::new();
            prepare_store(&repo, &gateway_config, server.admin.as_ref()).await?;
            gateway_router(repo, gateway_config, messages)
        }
    };

    // Build router
    let app = Router::new()
        .merge(gateway)
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!("Listening on {}", server.bind_addr);

    let listener = TcpListener::bind(server.bind_addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Startup cleanup, admin seeding and the periodic session sweeper
async fn prepare_store<R>(
    repo: &R,
    config: &GatewayConfig,
    admin: Option<&(String, String)>,
) -> anyhow::Result<()>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    // Errors here should not prevent server startup
    if let Err(e) = repo.cleanup_expired().await {
        tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
    }

    if let Some((login, password)) = admin {
        let users = UserStore::new(Arc::new(repo.clone()), Arc::new(config.clone()));
        match users.register(login, login, password.clone()).await {
            Ok(user) => tracing::info!(user_id = %user.user_id, "Seeded admin user"),
            Err(GatewayError::LoginTaken) => {
                tracing::info!(login = %login, "Admin user already exists");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let sweeper = repo.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        // first tick fires immediately; startup already cleaned
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = sweeper.cleanup_expired().await {
                tracing::warn!(error = %e, "Periodic session cleanup failed");
            }
        }
    });

    Ok(())
}
