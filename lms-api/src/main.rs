//! # LMS API Server
//!
//! REST backend for courses, course content, comments, feedback, categories
//! and completion tracking.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/lms JWT_SECRET=... cargo run -p lms-api
//! ```

use lms_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use lms_shared::db::{
    migrations::run_migrations,
    pool::{self, create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    init_tracing(config.log.format);

    tracing::info!("LMS API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let db = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        connect_timeout_seconds: config.database.connect_timeout_seconds,
        ..Default::default()
    })
    .await?;

    run_migrations(&db).await?;

    let address = config.bind_address();
    let app = build_router(AppState::new(db.clone(), config));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lms_api=debug,lms_shared=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
