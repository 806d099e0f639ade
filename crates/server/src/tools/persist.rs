//! interscribe_persist tool implementation.
//!
//! Writes the rotation index now instead of waiting for shutdown.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use interscribe_core::Interscriber;

use super::json_result;

/// Output from the interscribe_persist tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PersistOutput {
    /// Restart file that was written.
    pub path: String,
    /// Persisted index (-1 when nothing has been served yet).
    pub index: String,
}

/// Implementation of the interscribe_persist tool.
pub async fn persist_impl(interscriber: &Interscriber) -> Result<CallToolResult, McpError> {
    interscriber.persist()?;

    let output = PersistOutput {
        path: interscriber.config().restart_path().display().to_string(),
        index: interscriber.cursor().snapshot(),
    };
    json_result(&output)
}
