//! Error types for Studio Assist, one enum per external concern.
//!
//! There is deliberately no crate-wide aggregate error: the engine never
//! propagates a downstream failure upward (it logs and acknowledges), so
//! every call site names the concern-specific enum it actually handles.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Client state store errors.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("State backend unreachable: {0}")]
    Unreachable(String),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Completion request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),
}

/// Outbound messaging errors.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to send message to {to}: {reason}")]
    SendFailed { to: String, reason: String },

    #[error("Messaging provider rejected the request: {status} {body}")]
    Rejected { status: u16, body: String },
}

/// Audit log (lead spreadsheet) errors.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Append failed: {0}")]
    AppendFailed(String),

    #[error("Append rejected by spreadsheet API: {status} {body}")]
    Rejected { status: u16, body: String },

    #[error("Append failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}
