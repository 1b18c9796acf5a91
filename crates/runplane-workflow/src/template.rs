//! Container template builder.
//!
//! Turns one [`ContainerSpec`] into an engine [`Template`]: image, pull
//! policy, env, the three standard mounts, resources, and optional output
//! artifacts. Output depends only on the inputs.

use runplane_client::{
    Artifact, ArchiveStrategy, Container, EmptyDirVolumeSource, EnvVar, Outputs, Template,
    TemplateMetadata, Volume, VolumeMount,
};
use runplane_config::{ContainerConfig, PlatformConfig};
use runplane_types::ContainerSpec;

use crate::sizing::resource_requirements;

/// Name of the per-container scratch volume holding outputs.
pub const OUTPUT_VOLUME: &str = "out";

/// Sub-path of the shared claim mounted at the dataset path.
const DATASETS_SUBPATH: &str = "datasetsdir";

/// Sub-path of the shared claim mounted at the parameters path.
const PARAMETERS_SUBPATH: &str = "parametersdir";

/// Pull policy forced by `always_pull_images`.
const PULL_ALWAYS: &str = "Always";

/// Platform-wide values every container template shares.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDefaults {
    pub image_pull_policy: String,
    pub dataset_path: String,
    pub parameters_path: String,
    pub output_path: String,
    /// Shared claim backing the dataset and parameter mounts.
    pub claim_name: String,
}

impl ContainerDefaults {
    pub fn new(containers: &ContainerConfig, claim_name: impl Into<String>) -> Self {
        Self {
            image_pull_policy: containers.image_pull_policy.clone(),
            dataset_path: containers.dataset_path.clone(),
            parameters_path: containers.parameters_path.clone(),
            output_path: containers.output_path.clone(),
            claim_name: claim_name.into(),
        }
    }

    pub fn from_config(config: &PlatformConfig) -> Self {
        Self::new(&config.containers(), config.storage().claim_name)
    }

    fn artifact_path(&self, relative: &str) -> String {
        format!(
            "{}/{}",
            self.output_path.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }
}

impl Default for ContainerDefaults {
    fn default() -> Self {
        Self::from_config(&PlatformConfig::default())
    }
}

/// Build the engine template for one container.
pub fn build_template(
    spec: &ContainerSpec,
    defaults: &ContainerDefaults,
    always_pull_images: bool,
) -> Template {
    let image_pull_policy = if always_pull_images {
        PULL_ALWAYS.to_string()
    } else {
        defaults.image_pull_policy.clone()
    };

    let env = spec
        .env_vars
        .iter()
        .flatten()
        .map(|(name, value)| EnvVar {
            name: name.clone(),
            value: value.clone(),
        })
        .collect();

    let volume_mounts = vec![
        VolumeMount {
            name: defaults.claim_name.clone(),
            mount_path: defaults.dataset_path.clone(),
            sub_path: Some(DATASETS_SUBPATH.to_string()),
        },
        VolumeMount {
            name: defaults.claim_name.clone(),
            mount_path: defaults.parameters_path.clone(),
            sub_path: Some(PARAMETERS_SUBPATH.to_string()),
        },
        VolumeMount {
            name: OUTPUT_VOLUME.to_string(),
            mount_path: defaults.output_path.clone(),
            sub_path: None,
        },
    ];

    let container = Container {
        image: spec.image.clone(),
        image_pull_policy,
        command: spec.entrypoint.iter().cloned().collect(),
        args: spec.run_args.clone().unwrap_or_default(),
        env,
        volume_mounts,
        resources: resource_requirements(spec.resource_sizing.as_ref()),
    };

    let outputs = spec
        .output_artifacts
        .as_ref()
        .filter(|artifacts| !artifacts.is_empty())
        .map(|artifacts| Outputs {
            artifacts: artifacts
                .iter()
                .map(|a| Artifact {
                    name: a.name.clone(),
                    path: defaults.artifact_path(&a.path),
                    archive: ArchiveStrategy::default(),
                })
                .collect(),
        });

    let metadata = spec
        .labels
        .as_ref()
        .filter(|labels| !labels.is_empty())
        .map(|labels| TemplateMetadata {
            labels: labels.clone(),
        });

    Template {
        name: spec.node_key(),
        metadata,
        container: Some(container),
        dag: None,
        volumes: vec![Volume {
            name: OUTPUT_VOLUME.to_string(),
            empty_dir: Some(EmptyDirVolumeSource::default()),
        }],
        outputs,
    }
}
