//! Container descriptions supplied by the caller.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Dependency sentinel meaning "start immediately".
///
/// A container whose `dependencies` contain this marker has no dependencies
/// at all, whatever else is listed next to it.
pub const DAG_ROOT: &str = "DAG_ROOT";

/// One logical container of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    /// Name, unique within a run (case-insensitive).
    pub name: String,
    /// Container image reference.
    pub image: String,
    /// Overrides the image entrypoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    /// Arguments passed to the entrypoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_args: Option<Vec<String>>,
    /// Environment variables, in the order given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_vars: Option<IndexMap<String, String>>,
    /// Metadata labels attached to the container's pod.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    /// Names of the containers this one waits for.
    ///
    /// `None` chains the container after the previous one in the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_sizing: Option<ResourceSizing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_artifacts: Option<Vec<OutputArtifact>>,
}

impl ContainerSpec {
    /// Create a container with only a name and an image.
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            entrypoint: None,
            run_args: None,
            env_vars: None,
            labels: None,
            dependencies: None,
            resource_sizing: None,
            output_artifacts: None,
        }
    }

    /// Set the entrypoint.
    pub fn with_entrypoint(mut self, entrypoint: impl Into<String>) -> Self {
        self.entrypoint = Some(entrypoint.into());
        self
    }

    /// Set the entrypoint arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Add one environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Add one pod label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Declare explicit dependencies.
    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = Some(deps.into_iter().map(Into::into).collect());
        self
    }

    /// Mark the container as a DAG root.
    pub fn as_root(self) -> Self {
        self.with_dependencies([DAG_ROOT])
    }

    /// Set the resource sizing.
    pub fn with_sizing(mut self, sizing: ResourceSizing) -> Self {
        self.resource_sizing = Some(sizing);
        self
    }

    /// Declare an output artifact.
    pub fn with_output_artifact(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.output_artifacts
            .get_or_insert_with(Vec::new)
            .push(OutputArtifact {
                name: name.into(),
                path: path.into(),
            });
        self
    }

    /// Graph key: the lower-cased name.
    pub fn node_key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// An artifact produced by a container, relative to its output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputArtifact {
    pub name: String,
    pub path: String,
}

/// CPU and memory quantities in the engine's notation (`"2"`, `"500m"`, `"1Gi"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuantities {
    pub cpu: String,
    pub memory: String,
}

/// Requests/limits pair for one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSizing {
    pub requests: ResourceQuantities,
    pub limits: ResourceQuantities,
}

impl ResourceSizing {
    /// Sizing used when a container does not declare one.
    ///
    /// Requests and limits are both 3 CPUs and 4Gi of memory.
    pub fn basic() -> Self {
        Self::uniform("3", "4Gi")
    }

    /// Sizing with identical requests and limits.
    pub fn uniform(cpu: impl Into<String>, memory: impl Into<String>) -> Self {
        let quantities = ResourceQuantities {
            cpu: cpu.into(),
            memory: memory.into(),
        };
        Self {
            requests: quantities.clone(),
            limits: quantities,
        }
    }
}

impl Default for ResourceSizing {
    fn default() -> Self {
        Self::basic()
    }
}
