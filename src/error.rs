use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the failure cases that can occur while talking to the
/// accounting bridge or ingesting payroll data.
///
/// Per-record problems (an unmatched employee name, a rejected transaction)
/// are not errors; they are reported as [`RecordOutcome`](crate::import::RecordOutcome)
/// values so a single bad record never aborts a batch.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading the earnings CSV.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when encoding or decoding a bridge message fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the bridge endpoint cannot be reached or refuses the
    /// session handshake.
    #[error("cannot open accounting session at {addr}: {reason}")]
    Connection { addr: String, reason: String },

    /// Raised when the bridge connection drops mid-request.
    #[error("bridge transport error: {0}")]
    Bridge(String),

    /// Raised when the accounting application answers a list query with a
    /// non-zero status.
    #[error("query failed with status {status_code}: {message}")]
    Query { status_code: i32, message: String },

    /// Raised when the bridge answers a request with the wrong reply kind.
    #[error("unexpected bridge reply: expected {expected}, got {got}")]
    UnexpectedReply { expected: &'static str, got: &'static str },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
