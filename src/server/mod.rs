use crate::collection::CollectionManager;
use crate::config::Config;
use crate::metadata::OmdbProvider;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use cinelog_db::pool::init_pool;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod error;
pub mod routes_collection;
pub mod routes_users;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub manager: Arc<CollectionManager>,
    pub config: Arc<Config>,
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // API routes
        .nest("/api", api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Serve static files if directory is provided
    // Uses SPA fallback: serves index.html for any route that doesn't match a file
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        }
    }

    app
}

fn api_routes() -> Router<AppContext> {
    Router::new()
        .route(
            "/users",
            get(routes_users::list_users).post(routes_users::create_user),
        )
        .route(
            "/users/:id",
            get(routes_users::get_user).delete(routes_users::delete_user),
        )
        .route(
            "/users/:id/movies",
            get(routes_collection::list_user_movies).post(routes_collection::add_movie),
        )
        .route(
            "/collection/:id",
            get(routes_collection::get_entry)
                .patch(routes_collection::update_entry)
                .delete(routes_collection::delete_entry),
        )
        .route("/movies/recent", get(routes_collection::recent_movies))
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    // The OMDb key is resolved once here; starting without one is an error.
    let api_key = config.omdb.resolve_api_key().context(
        "OMDb API key is not configured (set [omdb] api_key or the OMDB_API_KEY environment variable)",
    )?;

    // Initialize database
    if let Some(parent) = std::path::Path::new(&config.server.db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {:?}", parent))?;
        }
    }
    tracing::info!("Initializing database at {}", config.server.db_path);
    let db = init_pool(&config.server.db_path)?;

    let fetcher = Arc::new(OmdbProvider::with_base_url(
        api_key,
        config.omdb.base_url.clone(),
    ));
    let manager = Arc::new(CollectionManager::new(db, fetcher));

    let ctx = AppContext {
        manager,
        config: Arc::new(config.clone()),
    };

    let app = create_router(ctx, config.server.static_dir.clone());

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
