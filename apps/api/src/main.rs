use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use talentverify_api::api::{self, AppState, Repositories};
use talentverify_api::config::AppConfig;
use talentverify_api::infrastructure::repositories::InMemoryStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("talentverify_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    if config.uses_default_secret() {
        tracing::warn!("JWT_SECRET not set, using the development secret");
    }

    let repositories = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database connected and migrated");

            Repositories::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, records are kept in memory only");
            Repositories::in_memory(Arc::new(InMemoryStore::new()))
        }
    };

    let state = AppState::new(repositories, &config);
    if let Some(admin) = &config.admin {
        state.ensure_admin(admin).await?;
    }

    let app = api::router(state);

    tracing::info!("Server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
