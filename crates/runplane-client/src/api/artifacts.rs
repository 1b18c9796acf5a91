//! Artifacts API.
//!
//! Artifacts are served outside `/api/v1` and keyed by workflow uid, so they
//! stay reachable after the workflow has been archived.

use crate::client::EngineClient;
use crate::error::Result;

/// Artifacts API client.
pub struct ArtifactsApi {
    client: EngineClient,
}

impl ArtifactsApi {
    pub(crate) fn new(client: EngineClient) -> Self {
        Self { client }
    }

    /// Download an output artifact of a node.
    pub async fn by_uid(&self, uid: &str, node_id: &str, artifact_name: &str) -> Result<Vec<u8>> {
        self.client
            .get_raw_bytes(&format!(
                "artifacts-by-uid/{}/{}/{}",
                uid, node_id, artifact_name
            ))
            .await
    }
}
