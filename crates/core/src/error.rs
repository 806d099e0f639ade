//! Unified error types for interscribe.
//!
//! Request handling never surfaces these to the client directly: the
//! materializer folds them into `CacheResult::Failed` and the original
//! resource is served. They reach callers only through the operator-facing
//! surfaces (MCP tools, CLI).

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for interscribe.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., a resource path escaping its root).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The filter file could not be opened or read.
    #[error("FILTER_UNREADABLE: {0}")]
    FilterUnreadable(String),

    /// The persisted rotation index could not be read or written.
    #[error("RESTART_IO: {0}")]
    RestartIo(String),

    /// The source artifact could not be read.
    #[error("SOURCE_IO: {0}")]
    SourceIo(String),

    /// The cache artifact could not be inspected or written.
    #[error("CACHE_WRITE: {0}")]
    CacheWrite(String),
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::FilterUnreadable(msg) => (-32020, msg.clone()),
            Error::RestartIo(msg) => (-32021, msg.clone()),
            Error::SourceIo(msg) => (-32022, msg.clone()),
            Error::CacheWrite(msg) => (-32023, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CacheWrite("/srv/cache/index.html".to_string());
        assert!(err.to_string().contains("CACHE_WRITE"));
        assert!(err.to_string().contains("/srv/cache/index.html"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::InvalidInput("resource path escapes its root".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);

        let err = Error::RestartIo("permission denied".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32021);
    }
}
