//! clubhaus API server.
//!
//! Wires configuration, logging, the database pool, and the guardianship
//! reconciliation routes into one axum application.

mod config;
mod logging;
mod openapi;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use clubhaus_api_guardians::{guardianship_routes, GuardianshipState};
use clubhaus_db::{run_migrations, DbPool};
use clubhaus_guardianship::{GuardianshipService, PgGuardianshipStore};

use crate::config::Config;
use crate::openapi::ApiDoc;

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: Configuration error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.rust_log);
    tracing::info!(environment = %config.app_env, "Starting clubhaus API");

    let pool = match DbPool::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool).await {
        tracing::error!(error = %e, "Failed to run migrations");
        std::process::exit(1);
    }

    let store = PgGuardianshipStore::new(pool.inner().clone());
    let service = Arc::new(GuardianshipService::new(store));
    let guardianship_state = GuardianshipState::new(service);

    let health_routes = Router::new()
        .route("/health", get(health))
        .with_state(pool.clone());

    let app = Router::new()
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/guardianship", guardianship_routes(guardianship_state))
        .merge(health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(&config.cors_origins));

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, addr = %addr, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %addr, "clubhaus API listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Liveness and database readiness probe.
async fn health(State(pool): State<DbPool>) -> impl IntoResponse {
    match pool.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "up" })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "down" })),
            )
        }
    }
}

/// Serve the OpenAPI document.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Build the CORS layer from the configured origins.
fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Skipping unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}
