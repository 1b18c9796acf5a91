//! Post-processing confirmation consulted when a workflow succeeds.

use async_trait::async_trait;
use runplane_types::{IngestionState, Run};

/// Reports whether the data produced by a succeeded run has been ingested.
///
/// Only asked when the engine phase is `Succeeded`. `None` means no
/// information, which leaves the run `Successful`.
#[async_trait]
pub trait IngestionProbe: Send + Sync {
    async fn ingestion_state(&self, run: &Run) -> Option<IngestionState>;
}
