//! Run orchestration facade.
//!
//! [`RunService`] is the entry point the surrounding service layer calls:
//!
//! - **submit**: build the workflow document and create it on the engine
//! - **get_status / refresh**: translate the engine's view into [`RunStatus`]
//!   and the normalized [`RunState`]
//! - **stop**: stop a workflow, best effort
//! - **get_logs / get_all_logs**: live logs with archive fallback
//! - **find_runs**: label-based lookup
//!
//! Every method is one awaited call sequence; nothing runs in the background
//! and callers decide how to react to the results.
//!
//! # Example
//!
//! ```ignore
//! use runplane_domain::RunService;
//!
//! let service = RunService::from_config(&config)?;
//! let mut run = service.submit(&request).await?;
//! let status = service.refresh(&mut run).await;
//! let logs = service.get_logs(&run).await?;
//! ```

mod error;
pub mod probe;
pub mod services;

pub use error::{Result, RunError};
pub use probe::IngestionProbe;
pub use services::status::run_status_from_workflow;
pub use services::{LabelSelector, RunService, WorkflowSummary};

pub use runplane_types::{Run, RunStartRequest, RunState, RunStatus, RunStatusNode};
