use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sar_api::config::ServerConfig;
use sar_api::data_source::HttpSubjectDataSource;
use sar_api::render_service::RenderService;
use sar_api::router::build_app_router;
use sar_api::state::AppState;
use sar_client::{DownstreamClient, S3DocumentStore};
use sar_rendering::health::TemplateVersionHealthTracker;
use sar_rendering::renderer::Renderer;
use sar_rendering::resolver::TemplateVersionResolver;
use sar_rendering::selector::TemplateSelector;
use sar_rendering::stores::{FileTemplateSource, HttpLiveTemplateSource, PgStores};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sar_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sar_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    sar_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    sar_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Downstream HTTP client ---
    let downstream = DownstreamClient::new(Duration::from_secs(config.downstream_timeout_secs));

    // --- Template pipeline ---
    let stores = Arc::new(PgStores::new(pool.clone()));
    let health = Arc::new(TemplateVersionHealthTracker::new(
        stores.clone(),
        stores.clone(),
    ));
    let resolver = Arc::new(TemplateVersionResolver::new(
        Arc::new(HttpLiveTemplateSource::new(downstream.clone())),
        stores.clone(),
        stores.clone(),
        Arc::clone(&health),
    ));
    let selector = TemplateSelector::new(
        resolver,
        Arc::new(FileTemplateSource::new(config.template_dir.clone())),
        health,
    );
    let renderer = Renderer::new(Arc::new(sar_rendering::interfaces::NoLookupDataFetcher));

    // --- Document store ---
    let document_store = S3DocumentStore::from_env(config.document_bucket.clone()).await;
    tracing::info!(bucket = %config.document_bucket, "Document store initialised");

    // --- Render service ---
    let render_service = Arc::new(RenderService::new(
        selector,
        renderer,
        Arc::new(HttpSubjectDataSource::new(downstream)),
        Arc::new(document_store),
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        render_service,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
