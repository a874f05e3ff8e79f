//! # TaskVault Task Service
//!
//! Stores per-user tasks behind bearer-token authentication. Tokens are
//! verified locally against the shared secret; the identity service is
//! never called at request time.
//!
//! ```bash
//! cargo run -p taskvault-tasks
//! ```

use taskvault_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};
use taskvault_tasks::{
    app::{build_router, AppState},
    config::Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskvault_tasks=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskVault task service v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    // An unreachable store at startup is fatal; better to exit than to
    // serve traffic we cannot back.
    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Task service listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
