//! interscribe_status tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use interscribe_core::Interscriber;

use super::json_result;

/// Implementation of the interscribe_status tool.
pub async fn status_impl(interscriber: &Interscriber) -> Result<CallToolResult, McpError> {
    json_result(&interscriber.status())
}
