//! Resource sizing to engine resource requirements.

use std::collections::BTreeMap;

use runplane_client::ResourceRequirements;
use runplane_types::{ResourceQuantities, ResourceSizing};

/// Map a container's sizing onto the engine's `requests`/`limits` block.
///
/// Absent sizing falls back to [`ResourceSizing::basic`]. Quantities are
/// passed through untouched; the engine validates them at submission.
pub fn resource_requirements(sizing: Option<&ResourceSizing>) -> ResourceRequirements {
    let sizing = sizing.cloned().unwrap_or_else(ResourceSizing::basic);
    ResourceRequirements {
        requests: quantities(&sizing.requests),
        limits: quantities(&sizing.limits),
    }
}

fn quantities(q: &ResourceQuantities) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("cpu".to_string(), q.cpu.clone()),
        ("memory".to_string(), q.memory.clone()),
    ])
}
