//! Step definitions and the insurance demo step catalog

use serde::{Deserialize, Serialize};

/// Stable, 1-indexed step identifier
pub type StepId = u32;

/// One stage of the guided flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: StepId,
    pub name: String,
    /// Badges the step as newly added functionality. Presentation only.
    #[serde(default)]
    pub is_new: bool,
    /// One-line summary shown by step views
    #[serde(default)]
    pub description: String,
}

impl StepDefinition {
    pub fn new(id: StepId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_new: false,
            description: String::new(),
        }
    }

    /// Mark the step with the "new" badge
    pub fn badged(mut self) -> Self {
        self.is_new = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// (id, name, is_new, description) for the insurance/UM demo
const INSURANCE_STEPS: &[(StepId, &str, bool, &str)] = &[
    (
        1,
        "Patient & Payer Selection",
        false,
        "Pick a sample patient and the payer the order will be billed to",
    ),
    (
        2,
        "Order Entry",
        false,
        "Enter the requested imaging study, indication and ordering provider",
    ),
    (
        3,
        "Pre-Submission Analysis",
        false,
        "Review the appropriateness summary before the request goes out",
    ),
    (
        4,
        "Appeal Risk Prediction",
        true,
        "Estimate how likely the request is to be denied and appealed",
    ),
    (
        5,
        "Documentation Assistant",
        true,
        "Collect the clinical notes the payer is expected to ask for",
    ),
    (
        6,
        "RBM Criteria Mapping",
        true,
        "Line the order up against the radiology benefit manager's criteria",
    ),
    (
        7,
        "Gold Card Check",
        true,
        "See whether the ordering provider is exempt from prior authorization",
    ),
    (
        8,
        "CMS Compliance",
        true,
        "Confirm the request meets CMS prior-authorization timing rules",
    ),
    (
        9,
        "Human-in-the-Loop Review",
        true,
        "A reviewer signs off on the packet before submission",
    ),
    (
        10,
        "Submit / Appeal",
        false,
        "Send the request, or draft an appeal for a denied one",
    ),
];

/// The ten-step insurance demo flow, in display order
pub fn insurance_demo_steps() -> Vec<StepDefinition> {
    INSURANCE_STEPS
        .iter()
        .map(|(id, name, is_new, description)| {
            let step = StepDefinition::new(*id, *name).with_description(*description);
            if *is_new {
                step.badged()
            } else {
                step
            }
        })
        .collect()
}
