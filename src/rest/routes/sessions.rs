//! Demo session endpoints.
//!
//! Each handler resolves exactly one session and runs one wizard operation
//! on that session's controller.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::products::Product;
use crate::rest::dto::{CreateSessionRequest, SessionResponse, TransitionResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::{ApiState, WizardSession};
use crate::wizard::StepId;

fn session_not_found(id: &Uuid) -> ApiError {
    ApiError::NotFound(format!("Session '{}' not found", id))
}

/// Run `op` against one session's wizard and snapshot the result
async fn with_session<T>(
    state: &ApiState,
    id: Uuid,
    op: impl FnOnce(&mut WizardSession) -> Result<T, ApiError>,
) -> Result<(T, SessionResponse), ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| session_not_found(&id))?;
    let out = op(session)?;
    Ok((out, SessionResponse::from(&*session)))
}

/// An empty body means "use the configured product"
fn parse_create_request(body: &[u8]) -> Result<CreateSessionRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateSessionRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid session request body: {}", e)))
}

/// Start a new demo session
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    tag = "Sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = SessionResponse),
        (status = 400, description = "Malformed body, unknown product or product without a demo", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let request = parse_create_request(&body)?;

    let product = match request.product.as_deref() {
        Some(key) => key.parse::<Product>()?,
        None => state.config.wizard.product,
    };

    let steps = state.steps_for(product).ok_or_else(|| {
        ApiError::BadRequest(format!("Product '{}' has no demo wizard", product))
    })?;

    let mut sessions = state.sessions.write().await;
    let session = sessions.create(product, steps)?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}

/// Get a session snapshot
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Session snapshot", body = SessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or_else(|| session_not_found(&id))?;
    Ok(Json(SessionResponse::from(session)))
}

/// End a session
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut sessions = state.sessions.write().await;
    sessions
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| session_not_found(&id))
}

/// Mark a step as completed
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/complete/{step_id}",
    tag = "Sessions",
    params(
        ("id" = Uuid, Path, description = "Session id"),
        ("step_id" = u32, Path, description = "Step id")
    ),
    responses(
        (status = 200, description = "Step completed", body = SessionResponse),
        (status = 400, description = "Step is not part of the wizard", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn complete(
    State(state): State<ApiState>,
    Path((id, step_id)): Path<(Uuid, StepId)>,
) -> Result<Json<SessionResponse>, ApiError> {
    let ((), session) = with_session(&state, id, |s| {
        s.controller.complete_step(step_id).map_err(ApiError::from)
    })
    .await?;
    Ok(Json(session))
}

/// Advance to the next step
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/next",
    tag = "Sessions",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Moved, or stayed at the final step", body = TransitionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn next(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let (moved, session) = with_session(&state, id, |s| Ok(s.controller.next_step())).await?;
    Ok(Json(TransitionResponse { moved, session }))
}

/// Go back one step
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/previous",
    tag = "Sessions",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Moved, or stayed at the first step", body = TransitionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn previous(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let (moved, session) =
        with_session(&state, id, |s| Ok(s.controller.previous_step())).await?;
    Ok(Json(TransitionResponse { moved, session }))
}

/// Jump to any step
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/goto/{step_id}",
    tag = "Sessions",
    params(
        ("id" = Uuid, Path, description = "Session id"),
        ("step_id" = u32, Path, description = "Step id")
    ),
    responses(
        (status = 200, description = "Current step set", body = SessionResponse),
        (status = 400, description = "Step is not part of the wizard", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn goto(
    State(state): State<ApiState>,
    Path((id, step_id)): Path<(Uuid, StepId)>,
) -> Result<Json<SessionResponse>, ApiError> {
    let ((), session) = with_session(&state, id, |s| {
        s.controller.go_to_step(step_id).map_err(ApiError::from)
    })
    .await?;
    Ok(Json(session))
}

/// Restart the session from the first step
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/reset",
    tag = "Sessions",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Session reset", body = SessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn reset(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let ((), session) = with_session(&state, id, |s| {
        s.controller.reset();
        Ok(())
    })
    .await?;
    Ok(Json(session))
}
