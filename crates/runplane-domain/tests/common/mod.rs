//! In-memory engine and probe for service tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use runplane_client::{
    Error, NodeStatus, ObjectMeta, Result, Workflow, WorkflowDocument, WorkflowEngine,
    WorkflowStatus,
};
use runplane_config::PlatformConfig;
use runplane_domain::{IngestionProbe, RunService};
use runplane_types::{ContainerSpec, IngestionState, Run, RunStartRequest};

/// Scripted answer for one engine call.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    NotFound,
    Fail(u16, &'static str),
}

impl<T: Clone> Reply<T> {
    fn get(&self, what: &str) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::NotFound => Err(Error::NotFound(what.to_string())),
            Reply::Fail(status, body) => Err(Error::Api {
                status: *status,
                message: body.to_string(),
                body: body.to_string(),
            }),
        }
    }
}

/// Engine answering from scripted replies and recording every call.
pub struct MockEngine {
    pub create: Mutex<Reply<Workflow>>,
    pub live: Mutex<Reply<Workflow>>,
    pub archived: Mutex<Reply<Workflow>>,
    pub stop: Mutex<Reply<Workflow>>,
    pub list: Mutex<Reply<Vec<Workflow>>>,
    pub pod_logs: Mutex<Reply<Vec<String>>>,
    pub artifact: Mutex<Reply<Vec<u8>>>,
    pub calls: Mutex<Vec<String>>,
    pub submitted: Mutex<Vec<WorkflowDocument>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self {
            create: Mutex::new(Reply::Fail(500, "not scripted")),
            live: Mutex::new(Reply::NotFound),
            archived: Mutex::new(Reply::NotFound),
            stop: Mutex::new(Reply::NotFound),
            list: Mutex::new(Reply::Ok(Vec::new())),
            pod_logs: Mutex::new(Reply::NotFound),
            artifact: Mutex::new(Reply::NotFound),
            calls: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

impl MockEngine {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl WorkflowEngine for MockEngine {
    async fn create_workflow(
        &self,
        namespace: &str,
        document: &WorkflowDocument,
    ) -> Result<Workflow> {
        self.record(format!("create {namespace}"));
        self.submitted.lock().push(document.clone());
        self.create.lock().get("create")
    }

    async fn get_workflow(&self, namespace: &str, name: &str) -> Result<Workflow> {
        self.record(format!("get {namespace}/{name}"));
        self.live.lock().get(name)
    }

    async fn get_archived_workflow(&self, uid: &str) -> Result<Workflow> {
        self.record(format!("archived {uid}"));
        self.archived.lock().get(uid)
    }

    async fn stop_workflow(&self, namespace: &str, name: &str) -> Result<Workflow> {
        self.record(format!("stop {namespace}/{name}"));
        self.stop.lock().get(name)
    }

    async fn list_workflows(&self, namespace: &str, label_selector: &str) -> Result<Vec<Workflow>> {
        self.record(format!("list {namespace} {label_selector}"));
        self.list.lock().get(namespace)
    }

    async fn get_output_artifact_by_uid(
        &self,
        uid: &str,
        node_id: &str,
        artifact_name: &str,
    ) -> Result<Vec<u8>> {
        self.record(format!("artifact {uid}/{node_id}/{artifact_name}"));
        self.artifact.lock().get(artifact_name)
    }

    async fn pod_logs(
        &self,
        namespace: &str,
        workflow_name: &str,
        pod_name: &str,
        container: &str,
    ) -> Result<Vec<String>> {
        self.record(format!("logs {namespace}/{workflow_name}/{pod_name}/{container}"));
        self.pod_logs.lock().get(pod_name)
    }
}

/// Probe returning a fixed answer and counting how often it was asked.
pub struct StaticProbe {
    pub answer: Option<IngestionState>,
    pub asked: Mutex<usize>,
}

impl StaticProbe {
    pub fn new(answer: Option<IngestionState>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            asked: Mutex::new(0),
        })
    }
}

#[async_trait]
impl IngestionProbe for StaticProbe {
    async fn ingestion_state(&self, _run: &Run) -> Option<IngestionState> {
        *self.asked.lock() += 1;
        self.answer
    }
}

pub fn config() -> PlatformConfig {
    PlatformConfig::from_toml(
        r#"
[engine]
url = "http://localhost:2746"
namespace = "sims"
"#,
    )
    .unwrap()
}

pub fn service(engine: &Arc<MockEngine>) -> RunService {
    RunService::new(engine.clone(), &config())
}

pub fn request() -> RunStartRequest {
    RunStartRequest::new(
        "sim-42",
        vec![
            ContainerSpec::new("fetchData", "fetch:1"),
            ContainerSpec::new("orchestrator", "orch:1"),
        ],
    )
    .with_label("runner-id", "r-1")
}

pub fn run() -> Run {
    Run::submitted("u-1", "wf-1", &request())
}

pub fn created(uid: &str, name: &str) -> Workflow {
    Workflow {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            uid: Some(uid.to_string()),
            ..Default::default()
        },
        status: None,
    }
}

pub fn pod(id: &str, display: &str) -> NodeStatus {
    NodeStatus {
        id: id.to_string(),
        display_name: Some(display.to_string()),
        node_type: Some("Pod".to_string()),
        ..Default::default()
    }
}

pub fn workflow(phase: &str, nodes: Vec<NodeStatus>) -> Workflow {
    Workflow {
        metadata: ObjectMeta {
            name: Some("wf-1".to_string()),
            uid: Some("u-1".to_string()),
            ..Default::default()
        },
        status: Some(WorkflowStatus {
            phase: Some(phase.to_string()),
            started_at: Some("2024-05-01T10:00:00Z".to_string()),
            nodes: nodes
                .into_iter()
                .map(|n| (n.id.clone(), n))
                .collect::<BTreeMap<_, _>>(),
            ..Default::default()
        }),
    }
}
