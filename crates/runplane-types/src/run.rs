//! Run requests and submitted runs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::container::ContainerSpec;
use crate::state::RunState;

/// Default workflow deadline: 8 hours.
pub const DEFAULT_EXECUTION_TIMEOUT_SECS: u64 = 28_800;

/// Default `generateName` prefix for submitted workflows.
pub const DEFAULT_GENERATE_NAME_PREFIX: &str = "workflow-";

/// A request to start a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStartRequest {
    /// Containers in declaration order. Must not be empty.
    pub containers: Vec<ContainerSpec>,
    /// Placement hint, turned into a node selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_name_prefix: Option<String>,
    /// Workflow metadata labels (organization, workspace, runner ids...).
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_timeout_seconds: Option<u64>,
    #[serde(default)]
    pub always_pull_images: bool,
    /// Caller-generated correlation token, copied into the resulting [`Run`].
    pub simulation_id: String,
}

impl RunStartRequest {
    pub fn new(simulation_id: impl Into<String>, containers: Vec<ContainerSpec>) -> Self {
        Self {
            containers,
            node_label: None,
            generate_name_prefix: None,
            labels: BTreeMap::new(),
            execution_timeout_seconds: None,
            always_pull_images: false,
            simulation_id: simulation_id.into(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_node_label(mut self, label: impl Into<String>) -> Self {
        self.node_label = Some(label.into());
        self
    }

    pub fn with_always_pull_images(mut self, always: bool) -> Self {
        self.always_pull_images = always;
        self
    }

    pub fn execution_timeout(&self) -> u64 {
        self.execution_timeout_seconds
            .unwrap_or(DEFAULT_EXECUTION_TIMEOUT_SECS)
    }

    pub fn name_prefix(&self) -> &str {
        self.generate_name_prefix
            .as_deref()
            .unwrap_or(DEFAULT_GENERATE_NAME_PREFIX)
    }

    /// Check the container list: non-empty, non-empty names, no duplicates
    /// (case-insensitive). Returns a description of the first problem found.
    pub fn check(&self) -> Result<(), String> {
        if self.containers.is_empty() {
            return Err("run must have at least one container".to_string());
        }
        let mut seen = std::collections::HashSet::new();
        for container in &self.containers {
            if container.name.trim().is_empty() {
                return Err("container name cannot be empty".to_string());
            }
            if !seen.insert(container.node_key()) {
                return Err(format!("duplicate container name: {}", container.name));
            }
        }
        Ok(())
    }
}

/// A run submitted to the workflow engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    workflow_id: String,
    workflow_name: String,
    pub simulation_id: String,
    pub state: RunState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_label: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Audit copy of the submitted containers. Never re-submitted.
    pub containers: Vec<ContainerSpec>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl Run {
    /// Build the run for a freshly created workflow. The state is assumed
    /// `Running` until the engine says otherwise.
    pub fn submitted(
        workflow_id: impl Into<String>,
        workflow_name: impl Into<String>,
        request: &RunStartRequest,
    ) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            workflow_name: workflow_name.into(),
            simulation_id: request.simulation_id.clone(),
            state: RunState::Running,
            node_label: request.node_label.clone(),
            labels: request.labels.clone(),
            containers: request.containers.clone(),
            created_at: Utc::now(),
            start_time: None,
            end_time: None,
        }
    }

    /// Engine-assigned workflow uid.
    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    /// Engine-assigned workflow name.
    pub fn workflow_name(&self) -> &str {
        &self.workflow_name
    }

    /// Whether the engine has reported the run as finished.
    pub fn has_ended(&self) -> bool {
        self.end_time.is_some()
    }
}
