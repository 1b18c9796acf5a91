//! Log retrieval with archive fallback.
//!
//! Live logs come from the pod log stream of a workflow node. Once a
//! workflow is gone from the cluster its logs only survive as the archived
//! log artifact of each node, downloaded by workflow uid.

use std::collections::BTreeMap;

use runplane_client::{NodeStatus, Workflow};
use runplane_types::Run;
use tracing::{debug, warn};

use super::RunService;
use crate::error::Result;

/// Where the workflow used for log lookup came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Live,
    Archive,
}

impl RunService {
    /// Logs of the run's orchestrator node.
    ///
    /// Returns an empty string when the workflow has no orchestrator node.
    pub async fn get_logs(&self, run: &Run) -> Result<String> {
        let (workflow, source) = self.log_source(run).await?;

        let Some(node) = workflow.node_by_display_name(&self.logs.orchestrator_node) else {
            warn!(
                workflow = %run.workflow_name(),
                node = %self.logs.orchestrator_node,
                "Orchestrator node not found, no logs"
            );
            return Ok(String::new());
        };

        self.node_logs(run, node, source).await
    }

    /// Logs of every pod node, keyed by container (display) name.
    pub async fn get_all_logs(&self, run: &Run) -> Result<BTreeMap<String, String>> {
        let (workflow, source) = self.log_source(run).await?;

        let pods: Vec<&NodeStatus> = workflow
            .status
            .iter()
            .flat_map(|s| s.nodes.values())
            .filter(|n| n.is_pod())
            .collect();

        let mut logs = BTreeMap::new();
        for node in pods {
            let Some(name) = node.display_name.as_deref() else {
                continue;
            };
            let text = self.node_logs(run, node, source).await?;
            logs.insert(name.to_string(), text);
        }
        Ok(logs)
    }

    /// Workflow carrying the node tree: the archive first for ended runs,
    /// the live workflow otherwise, each falling back to the other on
    /// not-found. When the fallback fails too, the first error is returned.
    async fn log_source(&self, run: &Run) -> Result<(Workflow, Source)> {
        if run.has_ended() {
            return match self.engine.get_archived_workflow(run.workflow_id()).await {
                Ok(workflow) => Ok((workflow, Source::Archive)),
                Err(archive_err) if archive_err.is_not_found() => {
                    debug!(uid = %run.workflow_id(), "Ended run not archived, trying live workflow");
                    match self.live_workflow(run).await {
                        Ok(workflow) => Ok((workflow, Source::Live)),
                        Err(e) => {
                            debug!(workflow = %run.workflow_name(), error = %e, "Live workflow unavailable");
                            Err(archive_err.into())
                        }
                    }
                }
                Err(e) => Err(e.into()),
            };
        }

        match self
            .engine
            .get_workflow(&self.namespace, run.workflow_name())
            .await
        {
            Ok(workflow) => Ok((workflow, Source::Live)),
            Err(live_err) if live_err.is_not_found() => {
                debug!(workflow = %run.workflow_name(), "Live workflow gone, using archive");
                match self.engine.get_archived_workflow(run.workflow_id()).await {
                    Ok(workflow) => Ok((workflow, Source::Archive)),
                    Err(e) => {
                        debug!(uid = %run.workflow_id(), error = %e, "Archived workflow unavailable");
                        Err(live_err.into())
                    }
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn live_workflow(&self, run: &Run) -> runplane_client::Result<Workflow> {
        self.engine
            .get_workflow(&self.namespace, run.workflow_name())
            .await
    }

    /// Live pod logs, or the archived artifact when the pod is gone. When
    /// both fail the live error is returned.
    async fn node_logs(&self, run: &Run, node: &NodeStatus, source: Source) -> Result<String> {
        if source == Source::Archive {
            return Ok(self.archived_node_logs(run, &node.id).await?);
        }

        let live = self
            .engine
            .pod_logs(
                &self.namespace,
                run.workflow_name(),
                &node.id,
                &self.logs.container,
            )
            .await;

        match live {
            Ok(lines) => Ok(lines.join("\n")),
            Err(live_err) if live_err.is_not_found() => {
                debug!(node = %node.id, "Pod logs gone, using archived artifact");
                match self.archived_node_logs(run, &node.id).await {
                    Ok(text) => Ok(text),
                    Err(e) => {
                        debug!(node = %node.id, error = %e, "Archived logs unavailable");
                        Err(live_err.into())
                    }
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn archived_node_logs(&self, run: &Run, node_id: &str) -> runplane_client::Result<String> {
        let bytes = self
            .engine
            .get_output_artifact_by_uid(run.workflow_id(), node_id, &self.logs.archived_logs_artifact)
            .await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
