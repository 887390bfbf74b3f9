//! Step commit protocol types.
//!
//! A commit either yields the finalized compute-capacity sub-model for the
//! parent wizard to aggregate, or the list of blocking field errors. Commit
//! never raises; invalid state is an outcome, not an exception.

use serde::Serialize;

use crate::error::VchResult;
use crate::types::ComputeCapacityModel;
use crate::validation::{CapacityField, FieldErrorKind};

/// Pseudo-field key for the compute-resource selection requirement.
pub const SELECTION_FIELD: &str = "compute_resource";

/// One blocking validation failure, keyed by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: CapacityField, kind: FieldErrorKind) -> Self {
        Self {
            field: field.key().to_string(),
            kind,
        }
    }

    /// The error reported when commit runs with no compute resource selected.
    pub fn selection_required() -> Self {
        Self {
            field: SELECTION_FIELD.to_string(),
            kind: FieldErrorKind::Required,
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

/// The committed step payload handed to the parent wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedConfig {
    pub compute_capacity: ComputeCapacityModel,
}

impl CommittedConfig {
    /// Serialize the payload for the provisioning pipeline.
    pub fn to_json(&self) -> VchResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Result of a step commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed(CommittedConfig),
    Invalid { errors: Vec<FieldError> },
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed(_))
    }

    pub fn committed(self) -> Option<CommittedConfig> {
        match self {
            CommitOutcome::Committed(config) => Some(config),
            CommitOutcome::Invalid { .. } => None,
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            CommitOutcome::Committed(_) => &[],
            CommitOutcome::Invalid { errors } => errors,
        }
    }
}
