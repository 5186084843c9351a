//! Multi-step demo wizard controller.
//!
//! The controller is the single source of truth for where a demo session is
//! in the flow and which steps have been finished. Step views read from it and
//! call back into it; they never hold wizard state of their own.

pub mod controller;
pub mod error;
pub mod steps;

pub use controller::{SubscriptionId, WizardController, WizardEvent, WizardState};
pub use error::WizardError;
pub use steps::{insurance_demo_steps, StepDefinition, StepId};
