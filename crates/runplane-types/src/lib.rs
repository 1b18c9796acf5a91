//! Shared types for the runplane orchestration core.
//!
//! - [`ContainerSpec`]: one logical container of a run, as supplied by the caller
//! - [`RunStartRequest`] / [`Run`]: what gets submitted and what comes back
//! - [`RunStatus`] / [`RunStatusNode`]: the engine's view, translated
//! - [`RunState`]: the closed set of normalized run states

pub mod container;
pub mod run;
pub mod state;
pub mod status;

pub use container::{ContainerSpec, DAG_ROOT, OutputArtifact, ResourceQuantities, ResourceSizing};
pub use run::{DEFAULT_EXECUTION_TIMEOUT_SECS, DEFAULT_GENERATE_NAME_PREFIX, Run, RunStartRequest};
pub use state::{IngestionState, RunState};
pub use status::{ResourcesDuration, RunStatus, RunStatusNode};
