use axum::http::{HeaderValue, header};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookmarkr::{
    Config,
    auth::AuthConfig,
    handlers::{AppState, create_router},
    sanitize::HtmlEscaper,
    storage::LibsqlStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();

    // Initialize tracing: JSON lines to the log file always, console only
    // outside production. The guard flushes the file writer on exit.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_level.clone().into());
    let (log_dir, log_name) = config.log_file_location();
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (file_writer, _log_guard) = tracing_appender::non_blocking(file_appender);
    let console = (!config.environment.is_production()).then(|| tracing_subscriber::fmt::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .with(console)
        .init();

    let store = if config.is_in_memory() {
        tracing::warn!("using an in-memory database, bookmarks will not survive a restart");
        LibsqlStore::in_memory().await?
    } else {
        LibsqlStore::open(&config.database).await?
    };

    let state = AppState {
        store: Arc::new(store),
        sanitizer: Arc::new(HtmlEscaper),
        auth: Arc::new(AuthConfig::new(config.api_token.clone())),
        environment: config.environment,
    };

    let app = create_router(state).layer(
        ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("SAMEORIGIN"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::REFERRER_POLICY,
                HeaderValue::from_static("no-referrer"),
            )),
    );

    let app = if config.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    let addr = config.bind_address();
    tracing::info!("Starting bookmarkr server on {}", addr);
    tracing::info!(
        environment = ?config.environment,
        database = ?config.database,
        log_file = ?config.log_file,
        "configuration loaded"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("ctrl+c signal received, shutting down");
        })
        .await?;

    Ok(())
}
