//! Wizard error types

use thiserror::Error;

use super::steps::StepId;

/// Errors raised by the wizard controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// An operation referenced a step id outside the configured sequence
    #[error("step {0} is not part of this wizard")]
    InvalidStepReference(StepId),

    /// A wizard needs at least one step
    #[error("wizard has no steps configured")]
    EmptySequence,

    /// Step ids are 1-indexed
    #[error("step ids must be positive (got 0)")]
    ZeroStepId,

    /// Two steps share an id
    #[error("step id {0} is configured more than once")]
    DuplicateStepId(StepId),

    /// Display order must follow ascending ids
    #[error("step id {0} comes after a higher id; steps must be listed in ascending id order")]
    StepOutOfOrder(StepId),
}

impl WizardError {
    /// Machine-readable error code, used in API responses
    pub fn code(&self) -> &'static str {
        match self {
            WizardError::InvalidStepReference(_) => "invalid_step",
            WizardError::EmptySequence => "empty_sequence",
            WizardError::ZeroStepId => "zero_step_id",
            WizardError::DuplicateStepId(_) => "duplicate_step_id",
            WizardError::StepOutOfOrder(_) => "step_out_of_order",
        }
    }
}
