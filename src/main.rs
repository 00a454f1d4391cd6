use folio_site::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    identity::{GoTrueClient, IdentityState},
    repository::{PostgresRepository, RepositoryState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initializes logging, opens both database pools, builds the
/// auth provider client and serves the router.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise verbose for this crate, quieter for the HTTP stack.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "folio_site=debug,tower_http=info,axum=info".into());

    // 3. Pretty logs locally, JSON lines in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Database Initialization
    // Two credential tiers: content reads run as the restricted public role, form
    // inserts and admin listings as the service role.
    let read_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    let service_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.service_db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check SERVICE_ROLE_DATABASE_URL.");

    let repo = Arc::new(PostgresRepository::new(read_pool, service_pool)) as RepositoryState;

    // 5. Auth Provider Client
    let identity = Arc::new(GoTrueClient::new(&config)) as IdentityState;

    // 6. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let site_url = config.site_url.clone();
    let app_state = AppState {
        repo,
        identity,
        config,
    };

    // 7. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: {}/swagger-ui", site_url);

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
