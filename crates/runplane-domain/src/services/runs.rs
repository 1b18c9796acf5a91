//! Submission, stop and label lookup.

use runplane_types::{Run, RunStartRequest, RunStatus};
use runplane_workflow::ENTRYPOINT_TEMPLATE;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::status::run_status_from_workflow;
use super::{LabelSelector, RunService};
use crate::error::{Result, RunError};

/// A workflow found by label lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub workflow_id: Option<String>,
    pub workflow_name: Option<String>,
    pub phase: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl RunService {
    /// Build the workflow for `request` and create it on the engine.
    ///
    /// Exactly one create call is made; a failure is never retried.
    pub async fn submit(&self, request: &RunStartRequest) -> Result<Run> {
        request.check().map_err(RunError::InvalidRequest)?;
        if let Some(clash) = request
            .containers
            .iter()
            .find(|c| c.node_key() == ENTRYPOINT_TEMPLATE)
        {
            return Err(RunError::InvalidRequest(format!(
                "container name '{}' is reserved",
                clash.name
            )));
        }

        let document = self.builder.build(request);
        let created = self
            .engine
            .create_workflow(&self.namespace, &document)
            .await
            .map_err(|e| {
                warn!(
                    simulation_id = %request.simulation_id,
                    error = %e,
                    "Workflow submission failed"
                );
                RunError::submission(&e)
            })?;

        let (Some(uid), Some(name)) = (created.uid(), created.name()) else {
            return Err(RunError::Submission {
                status: None,
                body: serde_json::to_string(&created).unwrap_or_default(),
            });
        };

        info!(
            simulation_id = %request.simulation_id,
            workflow = %name,
            uid = %uid,
            "Workflow submitted"
        );
        Ok(Run::submitted(uid, name, request))
    }

    /// Ask the engine to stop the run's workflow.
    ///
    /// Never fails: when the engine refuses or cannot be reached the run is
    /// left untouched and its last known status is returned.
    pub async fn stop(&self, run: &mut Run) -> RunStatus {
        match self
            .engine
            .stop_workflow(&self.namespace, run.workflow_name())
            .await
        {
            Ok(workflow) => {
                info!(workflow = %run.workflow_name(), "Workflow stopped");
                let status = run_status_from_workflow(&workflow, run);
                self.apply_status(run, &status).await;
                status
            }
            Err(e) => {
                warn!(
                    workflow = %run.workflow_name(),
                    error = %e,
                    "Could not stop workflow"
                );
                RunStatus::last_known(run)
            }
        }
    }

    /// List live workflows carrying all of the given labels.
    pub async fn find_runs(&self, selector: &LabelSelector) -> Result<Vec<WorkflowSummary>> {
        let selector = label_selector(selector);
        debug!(selector = %selector, "Listing workflows");

        let workflows = self
            .engine
            .list_workflows(&self.namespace, &selector)
            .await?;

        Ok(workflows
            .iter()
            .map(|wf| {
                let status = wf.status.as_ref();
                WorkflowSummary {
                    workflow_id: wf.uid().map(str::to_string),
                    workflow_name: wf.name().map(str::to_string),
                    phase: status.and_then(|s| s.phase.clone()),
                    start_time: status.and_then(|s| s.started_at.clone()),
                    end_time: status.and_then(|s| s.finished_at.clone()),
                }
            })
            .collect())
    }
}

/// `k1=v1,k2=v2` in key order.
fn label_selector(labels: &LabelSelector) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",")
}
