//! Memories Server
//!
//! REST API for the Memories social-sharing application: accounts, memory
//! entries, likes, comments, and the follow graph.
//!
//! Uses SQLite (embedded) as the content store and serves the built SPA
//! bundle alongside the API.

mod error;
mod extractors;
mod handlers;
mod services;
mod storage;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use services::{AuthService, MemoryService, SocialService};
use storage::{Database, EntityCache};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    pub memory_service: Arc<MemoryService>,
    pub social_service: Arc<SocialService>,
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Memories Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = load_config()
        .await
        .context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, db={}",
        config.bind_address, config.database_path
    );

    let db = Arc::new(
        Database::new(&config.database_path)
            .await
            .context("Failed to initialize database")?,
    );
    info!("SQLite database initialized at: {}", config.database_path);

    let cache = Arc::new(EntityCache::new());

    let auth_service = Arc::new(AuthService::new(db.clone(), config.jwt_secret.clone()));
    let memory_service = Arc::new(MemoryService::new(db.clone(), cache.clone()));
    let social_service = Arc::new(SocialService::new(db.clone(), cache.clone()));
    info!("Services initialized");

    let state = AppState {
        db,
        auth_service,
        memory_service,
        social_service,
    };

    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "./frontend".to_string());
    info!("Static files directory: {}", static_dir);
    let index_path = PathBuf::from(&static_dir).join("index.html");

    let app = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes())
        .nest_service(
            "/pkg",
            ServeDir::new(PathBuf::from(&static_dir).join("pkg")),
        )
        // SPA fallback - all remaining routes serve index.html
        .fallback_service(ServeFile::new(index_path))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/memories",
            get(handlers::memories::list).post(handlers::memories::create),
        )
        .route(
            "/memories/:id",
            get(handlers::memories::get)
                .put(handlers::memories::update)
                .delete(handlers::memories::delete),
        )
        .route("/memories/:id/like", put(handlers::memories::like))
        .route("/memories/:id/comment", post(handlers::memories::comment))
        .route("/users/profile/:username", get(handlers::users::profile))
        .route("/users/profile", put(handlers::users::update_profile))
        .route("/users/follow/:id", put(handlers::users::follow))
        .route("/users/popular", get(handlers::users::popular))
}

#[derive(Debug, Clone)]
struct Config {
    bind_address: String,
    database_path: String,
    jwt_secret: String,
}

async fn load_config() -> Result<Config> {
    let data_dir = std::env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"));

    tokio::fs::create_dir_all(&data_dir)
        .await
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
        data_dir.join("memories.db").to_string_lossy().to_string()
    });

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        warn!("JWT_SECRET not set, using default (insecure for production)");
        "change-me-in-production".to_string()
    });

    Ok(Config {
        bind_address,
        database_path,
        jwt_secret,
    })
}
