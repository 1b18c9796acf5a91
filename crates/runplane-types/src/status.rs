//! Observed execution status of a run.

use serde::{Deserialize, Serialize};

use crate::run::Run;
use crate::state::RunState;

/// Workflow-level status, recomputed on every query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatus {
    /// Raw engine phase.
    pub phase: Option<String>,
    pub progress: Option<String>,
    pub message: Option<String>,
    pub estimated_duration: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default)]
    pub nodes: Vec<RunStatusNode>,
}

impl RunStatus {
    /// Status with every field empty: the engine could not be asked.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Best-effort status built only from what the run already records.
    pub fn last_known(run: &Run) -> Self {
        Self {
            phase: (run.state == RunState::Failed).then(|| "Failed".to_string()),
            start_time: run.start_time.clone(),
            end_time: run.end_time.clone(),
            ..Self::default()
        }
    }

    pub fn is_unknown(&self) -> bool {
        self == &Self::default()
    }

    /// Look up a node by its display (container) name.
    pub fn node(&self, container_name: &str) -> Option<&RunStatusNode> {
        self.nodes
            .iter()
            .find(|n| n.container_name.as_deref() == Some(container_name))
    }
}

/// Resource usage reported by the engine, in resource-seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcesDuration {
    pub cpu: Option<i64>,
    pub memory: Option<i64>,
}

/// Observed execution of one DAG node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatusNode {
    pub id: String,
    pub name: Option<String>,
    pub container_name: Option<String>,
    #[serde(default)]
    pub outbound_nodes: Vec<String>,
    pub resources_duration_requested: Option<ResourcesDuration>,
    pub host_node_name: Option<String>,
    pub phase: Option<String>,
    pub progress: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}
