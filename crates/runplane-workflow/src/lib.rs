//! Builds engine workflow documents from run requests.
//!
//! ```text
//! RunStartRequest
//!   └─ per container ── sizing ── template     (container template builder)
//!   └─ containers ───── dag ───── entrypoint   (dependency inference)
//!   └─ run metadata ─── document               (WorkflowDocument for the engine)
//! ```

pub mod dag;
pub mod document;
pub mod sizing;
pub mod template;

pub use dag::{Dag, ENTRYPOINT_TEMPLATE, build_dag};
pub use document::{SIMULATION_ID_LABEL, WorkflowBuilder};
pub use sizing::resource_requirements;
pub use template::{ContainerDefaults, OUTPUT_VOLUME, build_template};
