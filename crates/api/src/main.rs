use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use houme_api::config::{DatabaseConfig, ServerConfig};
use houme_api::router::build_app_router;
use houme_api::state::AppState;
use houme_imagegen::{ImageGenApi, ImageGenConfig};
use houme_pipeline::{ImagePipeline, PgFragmentSource};
use houme_storage::{ArtifactPublisher, S3ArtifactStore, StorageConfig};

const DEFAULT_LOG_FILTER: &str =
    "houme_api=debug,houme_pipeline=debug,houme_imagegen=debug,houme_storage=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        area_label_mode = ?config.area_label_mode,
        "Loaded server configuration"
    );

    // --- Database ---
    let database = DatabaseConfig::from_env();
    let pool = houme_db::create_pool(&database.url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    houme_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    houme_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Object storage ---
    let storage_config = StorageConfig::from_env().expect("Invalid storage configuration");
    let store = S3ArtifactStore::from_config(&storage_config).await;
    tracing::info!(
        bucket = %storage_config.bucket,
        region = %storage_config.region,
        prefix = %storage_config.key_prefix,
        "S3 artifact store ready"
    );

    // --- Image generation ---
    let imagegen_config = ImageGenConfig::from_env().expect("Invalid image generation configuration");
    tracing::info!(?imagegen_config, "Loaded image generation configuration");
    let generator = ImageGenApi::new(imagegen_config).expect("Failed to build image generation client");

    // --- Pipeline ---
    let pipeline = ImagePipeline::new(
        Arc::new(PgFragmentSource::new(pool.clone())),
        Arc::new(generator),
        ArtifactPublisher::new(Arc::new(store), storage_config.key_prefix.clone()),
    )
    .with_label_mode(config.area_label_mode);
    tracing::info!(scoring = pipeline.has_scorer(), "Image pipeline ready");

    // --- App state ---
    let state = AppState {
        pool,
        pipeline: Arc::new(pipeline),
    };

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

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(listener, app).with_graceful_shutdown({
        let shutdown = Arc::clone(&shutdown);
        async move {
            shutdown_signal().await;
            shutdown.notify_one();
        }
    });

    let drain_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let drain_deadline = async {
        shutdown.notified().await;
        tokio::time::sleep(drain_timeout).await;
    };

    tokio::select! {
        result = server.into_future() => result.expect("Server error"),
        () = drain_deadline => {
            tracing::warn!(
                timeout_secs = config.shutdown_timeout_secs,
                "Shutdown timeout elapsed, dropping in-flight requests"
            );
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber. `LOG_FORMAT=json` selects JSON output.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
