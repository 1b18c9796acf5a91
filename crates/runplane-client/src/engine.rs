//! The engine seam used by the orchestration layer.
//!
//! [`WorkflowEngine`] lists every engine call the core makes. [`EngineClient`]
//! is the production implementation; tests substitute in-memory engines.

use async_trait::async_trait;

use crate::client::EngineClient;
use crate::error::Result;
use crate::types::{Workflow, WorkflowDocument};

/// Calls made against the workflow engine. Each is a single request/response.
#[async_trait]
pub trait WorkflowEngine: Send + Sync {
    /// Create a workflow; the response carries the engine-assigned uid and name.
    async fn create_workflow(&self, namespace: &str, document: &WorkflowDocument)
    -> Result<Workflow>;

    /// Get a live workflow with its status and node tree.
    async fn get_workflow(&self, namespace: &str, name: &str) -> Result<Workflow>;

    /// Get a workflow from the archive by uid.
    async fn get_archived_workflow(&self, uid: &str) -> Result<Workflow>;

    /// Stop a workflow.
    async fn stop_workflow(&self, namespace: &str, name: &str) -> Result<Workflow>;

    /// List live workflows matching a label selector.
    async fn list_workflows(&self, namespace: &str, label_selector: &str) -> Result<Vec<Workflow>>;

    /// Download a node output artifact by workflow uid.
    async fn get_output_artifact_by_uid(
        &self,
        uid: &str,
        node_id: &str,
        artifact_name: &str,
    ) -> Result<Vec<u8>>;

    /// Live log lines of one pod of a workflow.
    async fn pod_logs(
        &self,
        namespace: &str,
        workflow_name: &str,
        pod_name: &str,
        container: &str,
    ) -> Result<Vec<String>>;
}

#[async_trait]
impl WorkflowEngine for EngineClient {
    async fn create_workflow(
        &self,
        namespace: &str,
        document: &WorkflowDocument,
    ) -> Result<Workflow> {
        self.workflows().create(namespace, document).await
    }

    async fn get_workflow(&self, namespace: &str, name: &str) -> Result<Workflow> {
        self.workflows().get(namespace, name).await
    }

    async fn get_archived_workflow(&self, uid: &str) -> Result<Workflow> {
        self.archived_workflows().get(uid).await
    }

    async fn stop_workflow(&self, namespace: &str, name: &str) -> Result<Workflow> {
        self.workflows().stop(namespace, name).await
    }

    async fn list_workflows(&self, namespace: &str, label_selector: &str) -> Result<Vec<Workflow>> {
        self.workflows().list(namespace, label_selector).await
    }

    async fn get_output_artifact_by_uid(
        &self,
        uid: &str,
        node_id: &str,
        artifact_name: &str,
    ) -> Result<Vec<u8>> {
        self.artifacts().by_uid(uid, node_id, artifact_name).await
    }

    async fn pod_logs(
        &self,
        namespace: &str,
        workflow_name: &str,
        pod_name: &str,
        container: &str,
    ) -> Result<Vec<String>> {
        self.workflows()
            .logs(namespace, workflow_name, pod_name, container)
            .await
    }
}
