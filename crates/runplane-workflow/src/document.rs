//! Workflow document builder.

use std::collections::BTreeMap;

use runplane_client::{
    ClaimMetadata, ClaimResources, ClaimSpec, DocumentMetadata, LocalObjectReference,
    PersistentVolumeClaim, PodGc, TtlStrategy, WorkflowDocument, WorkflowSpec,
};
use runplane_config::{EngineConfig, PlatformConfig, StorageConfig};
use runplane_types::RunStartRequest;
use tracing::debug;

use crate::dag::{ENTRYPOINT_TEMPLATE, build_dag};
use crate::template::{ContainerDefaults, build_template};

/// Label carrying the run's simulation id, so runs can be found by it.
pub const SIMULATION_ID_LABEL: &str = "runplane.io/simulation-id";

/// Builds the engine document for a run request.
#[derive(Debug, Clone)]
pub struct WorkflowBuilder {
    defaults: ContainerDefaults,
    engine: EngineConfig,
    storage: StorageConfig,
}

impl WorkflowBuilder {
    pub fn new(config: &PlatformConfig) -> Self {
        Self {
            defaults: ContainerDefaults::from_config(config),
            engine: config.engine(),
            storage: config.storage(),
        }
    }

    pub fn container_defaults(&self) -> &ContainerDefaults {
        &self.defaults
    }

    /// Assemble the full workflow document.
    pub fn build(&self, request: &RunStartRequest) -> WorkflowDocument {
        let dag = build_dag(&request.containers);

        let mut templates = Vec::with_capacity(request.containers.len() + 1);
        templates.push(dag.entrypoint_template());
        templates.extend(
            request
                .containers
                .iter()
                .map(|c| build_template(c, &self.defaults, request.always_pull_images)),
        );

        let node_selector = request
            .node_label
            .as_ref()
            .map(|label| {
                BTreeMap::from([(self.engine.node_selector_key.clone(), label.clone())])
            })
            .unwrap_or_default();

        let spec = WorkflowSpec {
            entrypoint: ENTRYPOINT_TEMPLATE.to_string(),
            templates,
            active_deadline_seconds: Some(request.execution_timeout()),
            node_selector,
            service_account_name: self.engine.service_account.clone(),
            image_pull_secrets: self
                .engine
                .image_pull_secrets
                .iter()
                .map(|name| LocalObjectReference { name: name.clone() })
                .collect(),
            volume_claim_templates: vec![self.volume_claim()],
            pod_gc: self
                .storage
                .pod_gc_strategy
                .clone()
                .map(|strategy| PodGc { strategy }),
            ttl_strategy: self
                .storage
                .ttl_seconds_after_finished
                .map(|seconds| TtlStrategy {
                    seconds_after_completion: seconds,
                }),
        };

        debug!(
            simulation_id = %request.simulation_id,
            tasks = dag.tasks.len(),
            edges = dag.edges().len(),
            "Built workflow document"
        );

        WorkflowDocument {
            metadata: DocumentMetadata {
                generate_name: request.name_prefix().to_string(),
                labels: workflow_labels(request),
            },
            spec,
        }
    }

    fn volume_claim(&self) -> PersistentVolumeClaim {
        PersistentVolumeClaim {
            metadata: ClaimMetadata {
                name: self.storage.claim_name.clone(),
            },
            spec: ClaimSpec {
                access_modes: self.storage.access_modes.clone(),
                storage_class_name: self.storage.storage_class.clone(),
                resources: ClaimResources {
                    requests: BTreeMap::from([(
                        "storage".to_string(),
                        self.storage.request_size.clone(),
                    )]),
                },
            },
        }
    }
}

/// Request labels, plus the simulation id when it is a valid label value
/// and the caller did not set it already.
fn workflow_labels(request: &RunStartRequest) -> BTreeMap<String, String> {
    let mut labels = request.labels.clone();
    if is_label_value(&request.simulation_id) {
        labels
            .entry(SIMULATION_ID_LABEL.to_string())
            .or_insert_with(|| request.simulation_id.clone());
    }
    labels
}

fn is_label_value(value: &str) -> bool {
    let bytes = value.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            bytes.len() <= 63
                && first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes
                    .iter()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        }
        _ => false,
    }
}
