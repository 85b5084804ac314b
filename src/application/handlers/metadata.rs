use serde::{Deserialize, Serialize};

/// Response metadata added by the service layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub model: String,
    pub latency_ms: u64,
}
