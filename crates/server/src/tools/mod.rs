//! MCP tool implementations.
//!
//! This module contains all tools exposed by the interscribe server.

pub mod persist;
pub mod resolve;
pub mod status;

pub use persist::{PersistOutput, persist_impl};
pub use resolve::{ResolveParams, resolve_impl};
pub use status::status_impl;

use rmcp::{ErrorData as McpError, model::*};
use serde::Serialize;

/// Wrap a serializable output as pretty JSON tool content.
fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize output: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
