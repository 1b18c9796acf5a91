//! DAG builder: dependency inference over a run's containers.
//!
//! Rules, applied per container in input order:
//! 1. explicit `dependencies` without [`DAG_ROOT`]: exactly those (lower-cased)
//! 2. explicit `dependencies` containing [`DAG_ROOT`]: none
//! 3. no `dependencies`: the previous container, if any
//!
//! Rule 2 only affects the annotated container. A later container without
//! dependencies still chains after it.
//!
//! Acyclicity is not checked here; the engine rejects cycles at submission.

use runplane_client::{DagTask, DagTemplate, Template};
use runplane_types::{ContainerSpec, DAG_ROOT};

/// Name of the synthetic template wrapping all tasks.
pub const ENTRYPOINT_TEMPLATE: &str = "entrypoint";

/// The task graph of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Dag {
    pub tasks: Vec<DagTask>,
}

impl Dag {
    /// Entrypoint template referencing every task.
    pub fn entrypoint_template(&self) -> Template {
        Template {
            name: ENTRYPOINT_TEMPLATE.to_string(),
            dag: Some(DagTemplate {
                tasks: self.tasks.clone(),
            }),
            ..Default::default()
        }
    }

    /// All `(dependency, dependent)` edges, in task order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.tasks
            .iter()
            .flat_map(|task| {
                task.dependencies
                    .iter()
                    .map(move |dep| (dep.as_str(), task.name.as_str()))
            })
            .collect()
    }

    pub fn task(&self, name: &str) -> Option<&DagTask> {
        self.tasks.iter().find(|t| t.name == name)
    }
}

/// Build the DAG for a run's containers.
pub fn build_dag(containers: &[ContainerSpec]) -> Dag {
    let mut tasks = Vec::with_capacity(containers.len());
    let mut previous: Option<String> = None;

    for container in containers {
        let name = container.node_key();
        let dependencies = match &container.dependencies {
            Some(deps) if deps.iter().any(|d| d == DAG_ROOT) => Vec::new(),
            Some(deps) => {
                let mut lowered: Vec<String> = Vec::with_capacity(deps.len());
                for dep in deps.iter().map(|d| d.to_lowercase()) {
                    if !lowered.contains(&dep) {
                        lowered.push(dep);
                    }
                }
                lowered
            }
            None => previous.iter().cloned().collect(),
        };

        tasks.push(DagTask {
            template: name.clone(),
            name: name.clone(),
            dependencies,
        });
        previous = Some(name);
    }

    Dag { tasks }
}
