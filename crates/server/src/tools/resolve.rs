//! interscribe_resolve tool implementation.
//!
//! Runs one resource path through the cache and reports how the host should
//! serve it.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use interscribe_core::{Error, Interscriber};

use super::json_result;

/// Input parameters for interscribe_resolve tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResolveParams {
    /// Resource path of the request, e.g. `/path/to/page.blue`.
    pub resource_path: String,
}

/// Implementation of the interscribe_resolve tool.
pub async fn resolve_impl(interscriber: &Interscriber, params: ResolveParams) -> Result<CallToolResult, McpError> {
    if params.resource_path.trim().is_empty() {
        return Err(Error::InvalidInput("resource_path cannot be empty".into()).into());
    }

    let outcome = interscriber.process(&params.resource_path)?;
    tracing::debug!(resource = %outcome.resource_path, result = ?outcome.result, "resolved");

    json_result(&outcome)
}
