//! Normalized run states and the engine-phase mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// State of a run as seen by the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Unknown,
    Running,
    Successful,
    DataIngestionInProgress,
    Failed,
}

/// Outcome of post-processing (data ingestion) after a workflow succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngestionState {
    InProgress,
    Failure,
    Successful,
}

impl RunState {
    /// Map an engine workflow phase onto a run state.
    ///
    /// `ingestion` only matters for `Succeeded`. Unrecognized or missing
    /// phases map to `Unknown`, never to `Failed`.
    pub fn from_phase(phase: Option<&str>, ingestion: Option<IngestionState>) -> Self {
        match phase {
            Some("Pending") | Some("Running") => RunState::Running,
            Some("Succeeded") => match ingestion {
                None | Some(IngestionState::Successful) => RunState::Successful,
                Some(IngestionState::InProgress) => RunState::DataIngestionInProgress,
                Some(IngestionState::Failure) => RunState::Failed,
            },
            Some("Skipped") | Some("Failed") | Some("Error") | Some("Omitted") => RunState::Failed,
            _ => RunState::Unknown,
        }
    }

    /// `Successful` and `Failed` are final.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Successful | RunState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Unknown => "Unknown",
            RunState::Running => "Running",
            RunState::Successful => "Successful",
            RunState::DataIngestionInProgress => "DataIngestionInProgress",
            RunState::Failed => "Failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
