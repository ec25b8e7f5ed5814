//! Bulk import report types

use serde::{Deserialize, Serialize};

/// Result of a bulk import run.
///
/// A bad row never aborts the batch; it contributes one human-readable,
/// row-numbered message here while the remaining rows proceed. A malformed
/// file (missing, or no usable header) yields zero successes and a single
/// message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub success_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ImportOutcome {
    pub(crate) fn failed(message: String) -> Self {
        Self {
            success_count: 0,
            errors: vec![message],
        }
    }
}
