//! REST API hosting demo wizard sessions.
//!
//! Every session gets its own wizard controller, so many visitors can walk
//! the demo at once without seeing each other's progress.

use std::net::SocketAddr;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::{ApiState, SessionRegistry, WizardSession};

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/status", get(routes::health::status))
        // Catalog endpoints
        .route("/api/v1/products", get(routes::catalog::products))
        .route("/api/v1/steps", get(routes::catalog::steps))
        // Session endpoints
        .route("/api/v1/sessions", post(routes::sessions::create))
        .route(
            "/api/v1/sessions/:id",
            get(routes::sessions::get_one).delete(routes::sessions::delete),
        )
        .route(
            "/api/v1/sessions/:id/complete/:step_id",
            post(routes::sessions::complete),
        )
        .route("/api/v1/sessions/:id/next", post(routes::sessions::next))
        .route(
            "/api/v1/sessions/:id/previous",
            post(routes::sessions::previous),
        )
        .route(
            "/api/v1/sessions/:id/goto/:step_id",
            post(routes::sessions::goto),
        )
        .route("/api/v1/sessions/:id/reset", post(routes::sessions::reset))
        // API docs
        .route("/api/v1/openapi.json", get(openapi::openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server
pub async fn serve(state: ApiState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("REST API listening on http://{}", addr);

    let sweeper = state.spawn_idle_sweeper();
    let app = build_router(state);
    let result = axum::serve(listener, app).await;
    sweeper.abort();
    result?;

    Ok(())
}
