//! Domain services.
//!
//! [`RunService`] orchestrates runs against a [`WorkflowEngine`]. The
//! operations are split by concern:
//!
//! - `runs`: submission, stop, label lookup
//! - `status`: status translation and state refresh
//! - `logs`: live and archived log retrieval

mod logs;
mod runs;
pub mod status;

use std::collections::BTreeMap;
use std::sync::Arc;

use runplane_client::{EngineClient, WorkflowEngine};
use runplane_config::{LogsConfig, PlatformConfig};
use runplane_workflow::WorkflowBuilder;
use tracing::info;

use crate::error::Result;
use crate::probe::IngestionProbe;

pub use runs::WorkflowSummary;

/// Label equality constraints used to find runs.
pub type LabelSelector = BTreeMap<String, String>;

/// Run orchestration facade.
///
/// Holds no per-run state; every method works from the [`Run`](runplane_types::Run)
/// it is given plus what the engine reports.
#[derive(Clone)]
pub struct RunService {
    engine: Arc<dyn WorkflowEngine>,
    builder: WorkflowBuilder,
    namespace: String,
    logs: LogsConfig,
    probe: Option<Arc<dyn IngestionProbe>>,
}

impl RunService {
    /// Create a service over the given engine.
    pub fn new(engine: Arc<dyn WorkflowEngine>, config: &PlatformConfig) -> Self {
        let namespace = config.engine().namespace;
        info!(namespace = %namespace, "Initializing run service");

        Self {
            engine,
            builder: WorkflowBuilder::new(config),
            namespace,
            logs: config.logs(),
            probe: None,
        }
    }

    /// Validate the configuration and connect an [`EngineClient`].
    pub fn from_config(config: &PlatformConfig) -> Result<Self> {
        config.validate()?;
        let client = EngineClient::from_config(&config.engine())?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Consult `probe` when a workflow reports `Succeeded`.
    pub fn with_ingestion_probe(mut self, probe: Arc<dyn IngestionProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Namespace all workflows are created in.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The document builder, for callers that want to inspect a submission.
    pub fn workflow_builder(&self) -> &WorkflowBuilder {
        &self.builder
    }

    pub fn engine(&self) -> &Arc<dyn WorkflowEngine> {
        &self.engine
    }
}
