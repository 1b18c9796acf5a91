//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [engine]
//! url = "https://argo-server.argo.svc:2746"
//! namespace = "simulations"
//! service_account = "workflow"
//! insecure_skip_tls_verify = false
//!
//! [containers]
//! image_pull_policy = "IfNotPresent"
//!
//! [storage]
//! claim_name = "datadir"
//! storage_class = "standard"
//! request_size = "10Gi"
//!
//! [logs]
//! orchestrator_node = "orchestrator"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Environment variable overriding `engine.url`.
pub const ENGINE_URL_ENV: &str = "RUNPLANE_ENGINE_URL";

/// Environment variable overriding `engine.auth_token`.
pub const ENGINE_TOKEN_ENV: &str = "RUNPLANE_ENGINE_TOKEN";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (project-local
/// overrides) can be loaded and merged. Use the accessors to get a section
/// with defaults filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Workflow engine connection.
    pub engine: Option<EngineConfig>,

    /// Defaults shared by every container template.
    pub containers: Option<ContainerConfig>,

    /// Shared volume claim settings.
    pub storage: Option<StorageConfig>,

    /// Log retrieval settings.
    pub logs: Option<LogsConfig>,
}

impl PlatformConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: PlatformConfig) {
        if other.engine.is_some() {
            self.engine = other.engine;
        }
        if other.containers.is_some() {
            self.containers = other.containers;
        }
        if other.storage.is_some() {
            self.storage = other.storage;
        }
        if other.logs.is_some() {
            self.logs = other.logs;
        }
    }

    /// Engine section, defaults applied.
    pub fn engine(&self) -> EngineConfig {
        self.engine.clone().unwrap_or_default()
    }

    /// Containers section, defaults applied.
    pub fn containers(&self) -> ContainerConfig {
        self.containers.clone().unwrap_or_default()
    }

    /// Storage section, defaults applied.
    pub fn storage(&self) -> StorageConfig {
        self.storage.clone().unwrap_or_default()
    }

    /// Logs section, defaults applied.
    pub fn logs(&self) -> LogsConfig {
        self.logs.clone().unwrap_or_default()
    }

    /// Apply `RUNPLANE_ENGINE_URL` / `RUNPLANE_ENGINE_TOKEN` when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(ENGINE_URL_ENV).ok(),
            std::env::var(ENGINE_TOKEN_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, url: Option<String>, token: Option<String>) {
        let url = url.filter(|u| !u.is_empty());
        let token = token.filter(|t| !t.is_empty());
        if url.is_none() && token.is_none() {
            return;
        }
        let engine = self.engine.get_or_insert_with(EngineConfig::default);
        if let Some(url) = url {
            engine.url = url;
        }
        if let Some(token) = token {
            engine.auth_token = Some(token);
        }
    }

    /// Check the fields every engine call depends on.
    pub fn validate(&self) -> Result<()> {
        let engine = self.engine();
        require(&engine.url, "url", "[engine]")?;
        require(&engine.namespace, "namespace", "[engine]")?;
        require(&self.storage().claim_name, "claim_name", "[storage]")?;
        require(&self.logs().orchestrator_node, "orchestrator_node", "[logs]")?;
        Ok(())
    }
}

fn require(value: &str, field: &str, context: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: field.to_string(),
            context: context.to_string(),
        });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────────────────────────

/// Workflow engine connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of the engine's REST server.
    pub url: String,
    /// Namespace workflows are created in.
    pub namespace: String,
    /// Bearer token sent with every request.
    pub auth_token: Option<String>,
    /// Skip TLS certificate verification. Only for constrained deployments.
    pub insecure_skip_tls_verify: bool,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Service account the workflow pods run as.
    pub service_account: Option<String>,
    /// Image pull secrets attached to every workflow.
    pub image_pull_secrets: Vec<String>,
    /// Node selector key the run's node label is matched against.
    pub node_selector_key: String,
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: "https://localhost:2746".to_string(),
            namespace: "default".to_string(),
            auth_token: None,
            insecure_skip_tls_verify: false,
            timeout_secs: 30,
            service_account: None,
            image_pull_secrets: Vec::new(),
            node_selector_key: "runplane.io/node-group".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Containers
// ─────────────────────────────────────────────────────────────────────────────

/// Defaults applied to every container template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Pull policy unless the run asks for `Always`.
    pub image_pull_policy: String,
    /// Mount path of the shared dataset directory.
    pub dataset_path: String,
    /// Mount path of the shared parameters directory.
    pub parameters_path: String,
    /// Mount path of the per-container output scratch volume.
    pub output_path: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            image_pull_policy: "IfNotPresent".to_string(),
            dataset_path: "/mnt/run-data".to_string(),
            parameters_path: "/mnt/run-parameters".to_string(),
            output_path: "/var/run-output".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Storage
// ─────────────────────────────────────────────────────────────────────────────

/// Volume claim created alongside each workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Name of the claim, referenced by the dataset/parameter mounts.
    pub claim_name: String,
    /// Storage class; engine default when unset.
    pub storage_class: Option<String>,
    pub access_modes: Vec<String>,
    /// Requested capacity, e.g. `"1Gi"`.
    pub request_size: String,
    /// Seconds a finished workflow is kept before the engine deletes it.
    pub ttl_seconds_after_finished: Option<u64>,
    /// Pod garbage collection strategy, e.g. `"OnPodSuccess"`.
    pub pod_gc_strategy: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            claim_name: "datadir".to_string(),
            storage_class: None,
            access_modes: vec!["ReadWriteOnce".to_string()],
            request_size: "1Gi".to_string(),
            ttl_seconds_after_finished: None,
            pod_gc_strategy: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logs
// ─────────────────────────────────────────────────────────────────────────────

/// Log retrieval settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    /// Display name of the node whose logs are the run's logs.
    pub orchestrator_node: String,
    /// Container whose output is read from each pod.
    pub container: String,
    /// Artifact name the engine archives container logs under.
    pub archived_logs_artifact: String,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            orchestrator_node: "orchestrator".to_string(),
            container: "main".to_string(),
            archived_logs_artifact: "main-logs".to_string(),
        }
    }
}
