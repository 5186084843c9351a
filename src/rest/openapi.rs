//! OpenAPI specification builder using utoipa.

use axum::Json;
use utoipa::OpenApi;

use crate::rest::dto::{
    CreateSessionRequest, HealthResponse, ProductResponse, SessionResponse,
    SessionStepResponse, StatusResponse, StepResponse, TransitionResponse,
};
use crate::rest::error::ErrorResponse;

/// OpenAPI documentation for the demo session API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Imaging Demo API",
        description = "Hosts isolated wizard sessions for the imaging decision-support demos.",
        license(name = "MIT")
    ),
    paths(
        // Health endpoints
        crate::rest::routes::health::health,
        crate::rest::routes::health::status,
        // Catalog endpoints
        crate::rest::routes::catalog::products,
        crate::rest::routes::catalog::steps,
        // Session endpoints
        crate::rest::routes::sessions::create,
        crate::rest::routes::sessions::get_one,
        crate::rest::routes::sessions::delete,
        crate::rest::routes::sessions::complete,
        crate::rest::routes::sessions::next,
        crate::rest::routes::sessions::previous,
        crate::rest::routes::sessions::goto,
        crate::rest::routes::sessions::reset,
    ),
    components(
        schemas(
            HealthResponse,
            StatusResponse,
            ProductResponse,
            StepResponse,
            SessionResponse,
            SessionStepResponse,
            TransitionResponse,
            CreateSessionRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and status"),
        (name = "Catalog", description = "Products and wizard steps"),
        (name = "Sessions", description = "Per-visit wizard state and navigation")
    )
)]
pub struct ApiDoc;

/// Serve the generated OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
