//! Product catalog for the route shell.
//!
//! The shell decides which product demo is active and mounts or unmounts the
//! wizard; it never touches wizard internals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wizard::{insurance_demo_steps, StepDefinition};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    #[error("unknown product '{0}' (expected clinician, education or insurance)")]
    UnknownProduct(String),
}

/// The three sub-products of the decision-support line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    /// Point-of-order guidance for ordering clinicians
    Clinician,
    /// Case-based teaching tool
    Education,
    /// Utilization-management and prior-authorization tool
    #[default]
    Insurance,
}

impl Product {
    pub fn all() -> &'static [Product] {
        &[Product::Clinician, Product::Education, Product::Insurance]
    }

    /// Serialized key, as used in config and the API
    pub fn key(&self) -> &'static str {
        match self {
            Product::Clinician => "clinician",
            Product::Education => "education",
            Product::Insurance => "insurance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Product::Clinician => "Clinician",
            Product::Education => "Education",
            Product::Insurance => "Insurance & UM",
        }
    }

    pub fn tagline(&self) -> &'static str {
        match self {
            Product::Clinician => "Imaging appropriateness guidance at the point of order",
            Product::Education => "Teach appropriate imaging with worked cases",
            Product::Insurance => "Prior authorization and appeals with fewer denials",
        }
    }

    /// Path the route shell mounts this product under
    pub fn route(&self) -> &'static str {
        match self {
            Product::Clinician => "/clinician",
            Product::Education => "/education",
            Product::Insurance => "/insurance",
        }
    }

    /// Only the insurance product ships a guided demo today
    pub fn has_demo_wizard(&self) -> bool {
        matches!(self, Product::Insurance)
    }

    /// Default step sequence for this product's demo, if it has one
    pub fn demo_steps(&self) -> Option<Vec<StepDefinition>> {
        match self {
            Product::Insurance => Some(insurance_demo_steps()),
            Product::Clinician | Product::Education => None,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Product {
    type Err = ProductError;

    /// Accepts the key or the route, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('/').to_lowercase();
        Product::all()
            .iter()
            .copied()
            .find(|p| p.key() == normalized)
            .ok_or_else(|| ProductError::UnknownProduct(s.to_string()))
    }
}
