//! API endpoint implementations.

mod archived;
mod artifacts;
mod workflows;

pub use archived::ArchivedWorkflowsApi;
pub use artifacts::ArtifactsApi;
pub use workflows::{ListWorkflowsQuery, PodLogsQuery, WorkflowsApi};
