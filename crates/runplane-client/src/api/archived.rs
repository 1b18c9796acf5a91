//! Archived workflows API.

use crate::client::EngineClient;
use crate::error::Result;
use crate::types::Workflow;

/// Archived workflows API client.
pub struct ArchivedWorkflowsApi {
    client: EngineClient,
}

impl ArchivedWorkflowsApi {
    pub(crate) fn new(client: EngineClient) -> Self {
        Self { client }
    }

    /// Get an archived workflow by uid.
    pub async fn get(&self, uid: &str) -> Result<Workflow> {
        self.client.get(&format!("archived-workflows/{}", uid)).await
    }
}
