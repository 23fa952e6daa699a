use thiserror::Error;

/// Errors from the upstream fetch collaborators.
///
/// Transport failures and non-2xx statuses are kept distinct from decode
/// failures so callers can log them differently, but all three fold into
/// the same error-tagged response contract at the service boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid upstream payload: {0}")]
    Decode(String),
}

/// Result type for upstream fetch operations.
pub type Result<T> = std::result::Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(
            UpstreamError::Status(502).to_string(),
            "upstream returned status 502"
        );
    }

    #[test]
    fn test_transport_display() {
        assert_eq!(
            UpstreamError::Transport("connection refused".to_string()).to_string(),
            "transport error: connection refused"
        );
    }

    #[test]
    fn test_decode_display() {
        assert_eq!(
            UpstreamError::Decode("expected array".to_string()).to_string(),
            "invalid upstream payload: expected array"
        );
    }
}
