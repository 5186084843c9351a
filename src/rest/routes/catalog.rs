//! Product and step catalog endpoints.

use axum::{extract::State, Json};

use crate::products::Product;
use crate::rest::dto::{ProductResponse, StepResponse};
use crate::rest::state::ApiState;

/// List the product line
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Catalog",
    responses(
        (status = 200, description = "All products", body = Vec<ProductResponse>)
    )
)]
pub async fn products() -> Json<Vec<ProductResponse>> {
    Json(
        Product::all()
            .iter()
            .copied()
            .map(ProductResponse::from)
            .collect(),
    )
}

/// List the configured wizard steps
#[utoipa::path(
    get,
    path = "/api/v1/steps",
    tag = "Catalog",
    responses(
        (status = 200, description = "Step sequence in display order", body = Vec<StepResponse>)
    )
)]
pub async fn steps(State(state): State<ApiState>) -> Json<Vec<StepResponse>> {
    Json(state.steps.iter().map(StepResponse::from).collect())
}
