//! Error types for normalization and trace resolution.

use tontrace_cell::{CellError, MessageKind};

/// Errors surfaced by the kernel. An empty lookup is not an error.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// Strict normalization was asked for on a message of another kind.
    #[error("invalid message kind: expected {expected}, got {actual}")]
    InvalidMessageKind {
        expected: MessageKind,
        actual: MessageKind,
    },

    /// The input could not be decoded as a message.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// A trace source failed. Evaluation stopped at that source.
    #[error("trace source `{source_name}` unavailable: {cause}")]
    TraceSourceUnavailable {
        source_name: String,
        #[source]
        cause: TraceApiError,
    },
}

impl TraceError {
    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TraceSourceUnavailable { .. })
    }
}

impl From<CellError> for TraceError {
    fn from(err: CellError) -> Self {
        Self::MalformedMessage(err.to_string())
    }
}

/// Failure reported by a [`crate::TraceApi`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceApiError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("unexpected status {code}: {body}")]
    Status { code: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("undecodable response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_source_failures_are_retryable() {
        let unavailable = TraceError::TraceSourceUnavailable {
            source_name: "pending".into(),
            cause: TraceApiError::Status {
                code: 503,
                body: "busy".into(),
            },
        };
        assert!(unavailable.is_retryable());
        assert_eq!(
            unavailable.to_string(),
            "trace source `pending` unavailable: unexpected status 503: busy"
        );

        let kind = TraceError::InvalidMessageKind {
            expected: MessageKind::ExternalIn,
            actual: MessageKind::Internal,
        };
        assert!(!kind.is_retryable());
        assert_eq!(
            kind.to_string(),
            "invalid message kind: expected external-in, got internal"
        );
        assert!(!TraceError::from(CellError::InvalidLayout("short".into())).is_retryable());
    }
}
