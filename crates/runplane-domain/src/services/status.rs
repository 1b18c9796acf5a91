//! Status translation and run state refresh.

use runplane_client::{NodeStatus, Workflow};
use runplane_types::{ResourcesDuration, Run, RunState, RunStatus, RunStatusNode};
use tracing::{debug, warn};

use super::RunService;

const FAILED_PHASE: &str = "Failed";
const SUCCEEDED_PHASE: &str = "Succeeded";

/// Translate an engine workflow into a [`RunStatus`].
///
/// Fields are copied verbatim and nodes are ordered by id. A run already
/// marked `Failed` reports phase `Failed` whatever the engine says.
pub fn run_status_from_workflow(workflow: &Workflow, run: &Run) -> RunStatus {
    let mut status = match &workflow.status {
        Some(wf) => {
            let mut nodes: Vec<RunStatusNode> = wf.nodes.values().map(status_node).collect();
            nodes.sort_by(|a, b| a.id.cmp(&b.id));
            RunStatus {
                phase: wf.phase.clone(),
                progress: wf.progress.clone(),
                message: wf.message.clone(),
                estimated_duration: wf.estimated_duration,
                start_time: wf.started_at.clone(),
                end_time: wf.finished_at.clone(),
                nodes,
            }
        }
        None => RunStatus::default(),
    };

    if run.state == RunState::Failed {
        status.phase = Some(FAILED_PHASE.to_string());
    }
    status
}

fn status_node(node: &NodeStatus) -> RunStatusNode {
    RunStatusNode {
        id: node.id.clone(),
        name: node.name.clone(),
        container_name: node.display_name.clone(),
        outbound_nodes: node.outbound_nodes.clone(),
        resources_duration_requested: node.resources_duration.map(|d| ResourcesDuration {
            cpu: d.cpu,
            memory: d.memory,
        }),
        host_node_name: node.host_node_name.clone(),
        phase: node.phase.clone(),
        progress: node.progress.clone(),
        start_time: node.started_at.clone(),
        end_time: node.finished_at.clone(),
    }
}

/// Outcome of looking a run's workflow up on the engine.
enum Lookup {
    Found(Workflow),
    /// Neither live nor archived: the workflow was garbage collected.
    Missing,
    /// The engine could not answer.
    Unavailable,
}

impl RunService {
    /// Current status of a run.
    ///
    /// Looks at the live workflow first and the archive when the live one
    /// is gone. Never fails: when the engine cannot answer, an unknown
    /// status is returned and a warning logged.
    pub async fn get_status(&self, run: &Run) -> RunStatus {
        match self.find_workflow(run).await {
            Lookup::Found(workflow) => run_status_from_workflow(&workflow, run),
            Lookup::Missing | Lookup::Unavailable => RunStatus::unknown(),
        }
    }

    /// Fetch the status and fold it into `run`.
    ///
    /// A workflow gone from both the cluster and the archive leaves a
    /// non-terminal run `Unknown`. An unreachable engine changes nothing.
    pub async fn refresh(&self, run: &mut Run) -> RunStatus {
        match self.find_workflow(run).await {
            Lookup::Found(workflow) => {
                let status = run_status_from_workflow(&workflow, run);
                self.apply_status(run, &status).await;
                status
            }
            Lookup::Missing => {
                if !run.state.is_terminal() {
                    self.set_state(run, RunState::Unknown);
                }
                RunStatus::unknown()
            }
            Lookup::Unavailable => RunStatus::unknown(),
        }
    }

    /// Update timestamps and state from a freshly translated status.
    ///
    /// Terminal states are kept and an unknown status changes nothing.
    pub(crate) async fn apply_status(&self, run: &mut Run, status: &RunStatus) {
        if status.is_unknown() {
            return;
        }
        if status.start_time.is_some() {
            run.start_time = status.start_time.clone();
        }
        if status.end_time.is_some() {
            run.end_time = status.end_time.clone();
        }
        if run.state.is_terminal() {
            return;
        }

        let phase = status.phase.as_deref();
        let ingestion = match (phase, &self.probe) {
            (Some(SUCCEEDED_PHASE), Some(probe)) => probe.ingestion_state(run).await,
            _ => None,
        };
        self.set_state(run, RunState::from_phase(phase, ingestion));
    }

    fn set_state(&self, run: &mut Run, state: RunState) {
        if state != run.state {
            debug!(
                workflow = %run.workflow_name(),
                from = %run.state,
                to = %state,
                "Run state changed"
            );
            run.state = state;
        }
    }

    async fn find_workflow(&self, run: &Run) -> Lookup {
        let live = self
            .engine
            .get_workflow(&self.namespace, run.workflow_name())
            .await;
        let err = match live {
            Ok(workflow) => return Lookup::Found(workflow),
            Err(e) => e,
        };

        if !err.is_not_found() {
            warn!(workflow = %run.workflow_name(), error = %err, "Workflow status unavailable");
            return Lookup::Unavailable;
        }

        match self.engine.get_archived_workflow(run.workflow_id()).await {
            Ok(workflow) => Lookup::Found(workflow),
            Err(e) if e.is_not_found() => {
                warn!(
                    workflow = %run.workflow_name(),
                    uid = %run.workflow_id(),
                    "Workflow not found live or in the archive"
                );
                Lookup::Missing
            }
            Err(e) => {
                warn!(
                    workflow = %run.workflow_name(),
                    uid = %run.workflow_id(),
                    error = %e,
                    "Archived workflow unavailable"
                );
                Lookup::Unavailable
            }
        }
    }
}
