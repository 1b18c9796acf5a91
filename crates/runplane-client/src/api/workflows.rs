//! Live workflows API.

use crate::client::EngineClient;
use crate::error::{Error, Result};
use crate::types::{
    CreateWorkflowRequest, LogStreamLine, StopWorkflowRequest, StreamError, Workflow,
    WorkflowDocument, WorkflowList,
};

/// Query parameters for listing workflows.
#[derive(Debug, Default, serde::Serialize)]
pub struct ListWorkflowsQuery {
    /// Label selector, e.g. `runner-id=r-1,workspace-id=w-2`.
    #[serde(
        rename = "listOptions.labelSelector",
        skip_serializing_if = "Option::is_none"
    )]
    pub label_selector: Option<String>,
}

/// Query parameters for the live log stream of one pod.
#[derive(Debug, serde::Serialize)]
pub struct PodLogsQuery {
    #[serde(rename = "podName")]
    pub pod_name: String,
    #[serde(rename = "logOptions.container")]
    pub container: String,
}

/// Workflows API client.
pub struct WorkflowsApi {
    client: EngineClient,
}

impl WorkflowsApi {
    pub(crate) fn new(client: EngineClient) -> Self {
        Self { client }
    }

    /// Create a workflow.
    pub async fn create(&self, namespace: &str, workflow: &WorkflowDocument) -> Result<Workflow> {
        let request = CreateWorkflowRequest {
            namespace,
            server_dry_run: false,
            workflow,
        };
        self.client
            .post(&format!("workflows/{}", namespace), &request)
            .await
    }

    /// Get a live workflow by name.
    pub async fn get(&self, namespace: &str, name: &str) -> Result<Workflow> {
        self.client
            .get(&format!("workflows/{}/{}", namespace, name))
            .await
    }

    /// Stop a running workflow. Exit handlers still run.
    pub async fn stop(&self, namespace: &str, name: &str) -> Result<Workflow> {
        let request = StopWorkflowRequest { name, namespace };
        self.client
            .put(&format!("workflows/{}/{}/stop", namespace, name), &request)
            .await
    }

    /// List workflows matching a label selector.
    pub async fn list(&self, namespace: &str, label_selector: &str) -> Result<Vec<Workflow>> {
        let query = ListWorkflowsQuery {
            label_selector: Some(label_selector.to_string()).filter(|s| !s.is_empty()),
        };
        let list: WorkflowList = self
            .client
            .get_with_query(&format!("workflows/{}", namespace), &query)
            .await?;
        Ok(list.items.unwrap_or_default())
    }

    /// Fetch the live log lines of one pod.
    ///
    /// The engine streams one JSON object per line; plain-text lines are
    /// passed through as-is. An error line in the stream fails the call,
    /// with a gone pod reported as [`Error::NotFound`].
    pub async fn logs(
        &self,
        namespace: &str,
        name: &str,
        pod_name: &str,
        container: &str,
    ) -> Result<Vec<String>> {
        let query = PodLogsQuery {
            pod_name: pod_name.to_string(),
            container: container.to_string(),
        };
        let body = self
            .client
            .get_text(&format!("workflows/{}/{}/log", namespace, name), &query)
            .await?;
        parse_log_stream(&body)
    }
}

fn parse_log_stream(body: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in body.lines().filter(|line| !line.trim().is_empty()) {
        let parsed = match serde_json::from_str::<LogStreamLine>(line) {
            Ok(parsed) => parsed,
            Err(_) => {
                lines.push(line.to_string());
                continue;
            }
        };
        if let Some(err) = parsed.error {
            return Err(stream_error(err, line));
        }
        if let Some(entry) = parsed.result {
            lines.push(entry.content);
        }
    }
    Ok(lines)
}

fn stream_error(err: StreamError, line: &str) -> Error {
    if err.is_not_found() {
        return Error::NotFound(err.message);
    }
    let status = err.http_code.unwrap_or(500);
    let message = if err.message.is_empty() {
        format!("HTTP {}", status)
    } else {
        err.message
    };
    Error::Api {
        status,
        message,
        body: line.to_string(),
    }
}
