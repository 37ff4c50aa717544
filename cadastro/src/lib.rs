//! # cadastro: Users and Addresses Registry
//!
//! `cadastro` is a small HTTP service that keeps a registry of users and their postal
//! addresses. It exposes a RESTful JSON API for creating, listing, reading, updating and
//! deleting both kinds of records, validates every payload before touching storage, and keeps
//! referential integrity between a user and the addresses it owns.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! uses SQLite (through [sqlx]) for persistence. Migrations are embedded in the binary and run on
//! startup, so pointing `database.url` at a fresh file is enough to get a working service.
//!
//! ### Request Flow
//!
//! A request passes through the tracing and CORS layers and reaches a handler in
//! [`api::handlers`]. JSON bodies are extracted with [`api::validation::ValidatedJson`], which
//! rejects malformed or out-of-bounds payloads with a `400` before any storage access. Handlers
//! then talk to the database through the repositories in [`db::handlers`]; multi-step operations
//! (reading a user with its addresses, deleting a user together with its addresses) run inside a
//! single transaction. Failures are mapped to HTTP responses by [`errors::Error`].
//!
//! ### Core Components
//!
//! The **API layer** ([`api`]) defines request/response models and the handlers mounted under
//! `/usuarios` and `/enderecos`. An OpenAPI document is served at `/api-docs/openapi.json` and an
//! interactive reference at `/docs`.
//!
//! The **database layer** ([`db`]) uses the repository pattern: [`db::handlers::Users`] and
//! [`db::handlers::Addresses`] wrap a connection and implement [`db::handlers::Repository`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use cadastro::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = cadastro::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     cadastro::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
mod types;

#[cfg(test)]
pub mod test_utils;

use crate::{
    api::handlers::{addresses, index, users},
    config::CorsOrigin,
    openapi::ApiDoc,
};
use axum::{
    Json, Router, http,
    http::HeaderValue,
    routing::{get, post, put},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{AddressId, UserId};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
}

/// Get the cadastro database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.cors;

    let allow_origin = if cors_config.allowed_origins.contains(&CorsOrigin::Wildcard) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Url keeps a trailing slash that browsers never send in the Origin header
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cors_config.allow_credentials)
        .expose_headers(vec![http::header::LOCATION]);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// This function constructs the complete Axum router with:
/// - User routes (`/usuarios`, `/usuarios/{id}`)
/// - Address routes (`/usuarios/{id}/enderecos`, `/enderecos/{id}`)
/// - Health check, welcome document, OpenAPI JSON and the Scalar reference
/// - Optional Prometheus metrics
/// - CORS configuration
/// - Tracing middleware
///
/// # Errors
///
/// Returns an error if CORS configuration is invalid.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        .route("/", get(index::welcome))
        // Users
        .route("/usuarios", post(users::create_user).get(users::list_users))
        .route(
            "/usuarios/{id}",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        // Addresses as user sub-resources
        .route(
            "/usuarios/{id}/enderecos",
            post(addresses::create_address).get(addresses::list_user_addresses),
        )
        .route(
            "/enderecos/{id}",
            put(addresses::update_address).delete(addresses::delete_address),
        )
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;
    let mut router = router.layer(cors_layer);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns the router, the configuration and the connection pool.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] opens the database and runs migrations
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown signal is received, in-flight requests finish, the pool is
///    closed and telemetry is flushed
pub struct Application {
    router: Router,
    config: Config,
    pool: SqlitePool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting cadastro with configuration: {:#?}", config);

        let pool = db::pools::connect(&config.database, config.slow_statement_threshold()).await?;
        Self::new_with_pool(config, pool).await
    }

    /// Create an application on top of an existing pool. Migrations are applied to it.
    pub async fn new_with_pool(config: Config, pool: SqlitePool) -> anyhow::Result<Self> {
        migrator().run(&pool).await?;

        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(&app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "cadastro listening on http://{}, docs available at http://localhost:{}/docs",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::CorsConfig;
    use crate::test_utils::*;
    use axum::http::StatusCode;

    #[test_log::test(tokio::test)]
    async fn test_healthz() {
        let (app, _db) = create_test_app().await;

        let response = app.get("/healthz").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[test_log::test(tokio::test)]
    async fn test_migrations_are_idempotent() {
        let db = TestDb::new().await;

        // TestDb already migrated once; a restart must not fail
        migrator().run(&db.pool).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'addresses') ORDER BY name",
        )
        .fetch_all(&db.pool)
        .await
        .unwrap();
        assert_eq!(tables, vec!["addresses".to_string(), "users".to_string()]);
    }

    #[test_log::test(tokio::test)]
    async fn test_unknown_route_is_not_found() {
        let (app, _db) = create_test_app().await;

        app.get("/clientes").await.assert_status_not_found();
    }

    #[test_log::test(tokio::test)]
    async fn test_metrics_route_absent_when_disabled() {
        let (app, _db) = create_test_app().await;

        app.get("/internal/metrics").await.assert_status_not_found();
    }

    #[test_log::test(tokio::test)]
    async fn test_metrics_route_when_enabled() {
        let db = TestDb::new().await;
        let mut config = create_test_config();
        config.enable_metrics = true;

        let app = Application::new_with_pool(config, db.pool.clone()).await.unwrap().into_test_server();
        app.get("/healthz").await.assert_status_ok();

        let response = app.get("/internal/metrics").await;
        response.assert_status_ok();
        assert!(response.text().contains("axum_http_requests"));
    }

    #[test_log::test(tokio::test)]
    async fn test_cors_wildcard_by_default() {
        let (app, _db) = create_test_app().await;

        let response = app
            .get("/usuarios")
            .add_header("origin", "https://app.example.com")
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_cors_restricted_origins() {
        let db = TestDb::new().await;
        let mut config = create_test_config();
        config.cors = CorsConfig {
            allowed_origins: vec![CorsOrigin::Url("https://app.example.com".parse().unwrap())],
            allow_credentials: true,
            max_age: None,
        };

        let app = Application::new_with_pool(config, db.pool.clone()).await.unwrap().into_test_server();

        let allowed = app.get("/healthz").add_header("origin", "https://app.example.com").await;
        assert_eq!(
            allowed.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
            Some("https://app.example.com")
        );
        assert_eq!(
            allowed.headers().get("access-control-allow-credentials").and_then(|v| v.to_str().ok()),
            Some("true")
        );

        let denied = app.get("/healthz").add_header("origin", "https://evil.example.com").await;
        assert_eq!(denied.status_code(), StatusCode::OK);
        assert!(denied.headers().get("access-control-allow-origin").is_none());
    }

    #[test_log::test(tokio::test)]
    async fn test_openapi_json_served() {
        let (app, _db) = create_test_app().await;

        let response = app.get("/api-docs/openapi.json").await;
        response.assert_status_ok();
        let doc: serde_json::Value = response.json();
        assert!(doc["paths"]["/usuarios"].is_object());
        assert!(doc["paths"]["/enderecos/{id}"].is_object());

        app.get("/docs").await.assert_status_ok();
    }
}
