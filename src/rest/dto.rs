//! Data Transfer Objects for the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::products::Product;
use crate::rest::state::WizardSession;
use crate::wizard::{StepDefinition, StepId};

// =============================================================================
// Health DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    /// Product new sessions start in by default
    pub product: String,
    pub step_count: usize,
    pub active_sessions: usize,
}

// =============================================================================
// Catalog DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub key: String,
    pub label: String,
    pub tagline: String,
    pub route: String,
    pub has_demo_wizard: bool,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            key: product.key().to_string(),
            label: product.label().to_string(),
            tagline: product.tagline().to_string(),
            route: product.route().to_string(),
            has_demo_wizard: product.has_demo_wizard(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StepResponse {
    pub id: StepId,
    pub name: String,
    pub is_new: bool,
    pub description: String,
}

impl From<&StepDefinition> for StepResponse {
    fn from(step: &StepDefinition) -> Self {
        Self {
            id: step.id,
            name: step.name.clone(),
            is_new: step.is_new,
            description: step.description.clone(),
        }
    }
}

// =============================================================================
// Session DTOs
// =============================================================================

/// Request body for starting a session
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    /// Product key or route; defaults to the configured product
    #[serde(default)]
    pub product: Option<String>,
}

/// A step as seen from inside one session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionStepResponse {
    pub id: StepId,
    pub name: String,
    pub is_new: bool,
    pub completed: bool,
    pub current: bool,
}

/// Snapshot of one session's wizard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub product: String,
    pub current_step_id: StepId,
    pub current_step_name: String,
    pub completed_step_ids: Vec<StepId>,
    pub is_first_step: bool,
    pub is_final_step: bool,
    pub is_complete: bool,
    /// e.g. "Patient & Payer Selection > [Order Entry] > ..."
    pub progress: String,
    pub steps: Vec<SessionStepResponse>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl From<&WizardSession> for SessionResponse {
    fn from(session: &WizardSession) -> Self {
        let wizard = &session.controller;
        let current = wizard.current_step_id();
        Self {
            id: session.id,
            product: session.product.key().to_string(),
            current_step_id: current,
            current_step_name: wizard.current_step().name.clone(),
            completed_step_ids: wizard.completed_step_ids().iter().copied().collect(),
            is_first_step: wizard.is_first_step(),
            is_final_step: wizard.is_final_step(),
            is_complete: wizard.is_complete(),
            progress: wizard.format_progress(),
            steps: wizard
                .steps()
                .iter()
                .map(|step| SessionStepResponse {
                    id: step.id,
                    name: step.name.clone(),
                    is_new: step.is_new,
                    completed: wizard.is_step_completed(step.id),
                    current: step.id == current,
                })
                .collect(),
            created_at: session.created_at,
            last_active: session.last_active,
        }
    }
}

/// Result of next/previous: whether the current step changed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransitionResponse {
    pub moved: bool,
    pub session: SessionResponse,
}
